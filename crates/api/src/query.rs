//! Query parameter types for API handlers.

use serde::Deserialize;

/// Parameters for `GET /preferences` (`?page=&per_page=&category=`).
///
/// Values are clamped with the helpers in
/// [`preferences_core::pagination`].
#[derive(Debug, Default, Deserialize)]
pub struct ListPreferencesParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    /// Restrict to records carrying this single category label.
    pub category: Option<String>,
}
