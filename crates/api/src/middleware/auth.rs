//! API-key authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use preferences_core::error::CoreError;

use crate::error::AppError;
use crate::state::AppState;

/// Request header carrying the API key.
pub const API_TOKEN_HEADER: &str = "api_token";

/// Optional scheme prefix in front of the key (`API_TOKEN: ApiKey <key>`).
pub const API_KEY_SCHEME: &str = "ApiKey ";

/// Caller authenticated by the static API key.
///
/// Use this as the first extractor of any protected handler so requests are
/// rejected before the body is read or the store is touched:
///
/// ```ignore
/// async fn my_handler(user: ApiKeyUser) -> AppResult<Json<()>> {
///     tracing::info!(user = %user.username, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiKeyUser {
    /// Identity bound to the presented key.
    pub username: String,
}

impl FromRequestParts<AppState> for ApiKeyUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(API_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Missing API_TOKEN header".into()))
            })?;

        let token = raw.strip_prefix(API_KEY_SCHEME).unwrap_or(raw).trim();

        let identity = state.credentials.verify(token).ok_or_else(|| {
            tracing::warn!("Rejected request with invalid API key");
            AppError::Core(CoreError::Unauthorized("Invalid API key".into()))
        })?;

        Ok(ApiKeyUser {
            username: identity.username.clone(),
        })
    }
}
