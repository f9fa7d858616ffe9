//! Request handlers.
//!
//! Handlers delegate to the repository in `preferences_db` and the query
//! engine in `preferences_core`, and map errors via [`crate::error::AppError`].

pub mod preferences;
