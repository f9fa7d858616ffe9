//! Domain logic for the preferences service.
//!
//! Nothing in this crate touches the database directly: the category query
//! engine reads through the [`query::CategorySource`] trait, which the `db`
//! crate implements on top of PostgreSQL.

pub mod categories;
pub mod credentials;
pub mod error;
pub mod pagination;
pub mod query;
pub mod render;
pub mod types;
