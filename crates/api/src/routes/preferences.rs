//! Route definitions for the preferences table.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::preferences;
use crate::state::AppState;

/// Routes mounted at `/preferences`.
///
/// ```text
/// GET    /                         -> list_preferences
/// POST   /create                   -> create_preference
/// GET    /category/{categories}    -> get_by_categories
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(preferences::list_preferences))
        .route("/create", post(preferences::create_preference))
        .route("/category/{categories}", get(preferences::get_by_categories))
}
