use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::response::MessageResponse;
use crate::state::AppState;

/// Greeting returned by the root liveness probe.
pub const ROOT_MESSAGE: &str = "This is the preferences API server";

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the database is reachable.
    pub db_healthy: bool,
}

/// GET / -- liveness probe, never touches the database.
async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: ROOT_MESSAGE,
    })
}

/// GET /health -- returns service and database health.
///
/// The database only counts as healthy when the configured table is readable.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = preferences_db::health_check(state.pool()).await.is_ok()
        && state.repo.ensure_table().await.is_ok();

    let status = if db_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

/// Unauthenticated probe routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
}
