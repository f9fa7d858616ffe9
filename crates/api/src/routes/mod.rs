pub mod health;
pub mod preferences;

use axum::Router;

use crate::state::AppState;

/// Build the API route tree.
///
/// Route hierarchy:
///
/// ```text
/// /preferences                                     paged listing (GET)
/// /preferences/create                              insert a record (POST)
/// /preferences/category/{categories}               grouped lookup (GET)
/// ```
///
/// All of these require the API key.
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/preferences", preferences::router())
}
