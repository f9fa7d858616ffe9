//! Shared response envelope types for API handlers.

use preferences_core::pagination::PageInfo;
use serde::Serialize;

/// `{ "data": [...], "pagination": {...} }` envelope for paged listings.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    pub data: Vec<T>,
    pub pagination: PageInfo,
}

/// `{ "message": ... }` body of the root liveness probe.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
