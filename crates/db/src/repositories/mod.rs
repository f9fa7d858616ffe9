//! Repository layer.
//!
//! Repositories provide async query methods over a shared `PgPool`.

pub mod preference_repo;

pub use preference_repo::{InvalidSchemaName, PreferenceRepo};
