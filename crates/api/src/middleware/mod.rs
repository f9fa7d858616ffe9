//! Authentication extractors.
//!
//! - [`auth::ApiKeyUser`] -- Resolves the static API key in the `API_TOKEN` header.

pub mod auth;
