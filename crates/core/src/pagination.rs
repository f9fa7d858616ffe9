//! Offset pagination helpers.
//!
//! Pages are 1-based. Callers pass the raw query parameters and get back
//! clamped values plus the SQL offset, so handlers never do the arithmetic.

use serde::Serialize;

/// Default page size when `per_page` is omitted.
pub const DEFAULT_PER_PAGE: i64 = 20;

/// Largest page size a caller may request.
pub const MAX_PER_PAGE: i64 = 100;

/// Clamp a user-provided page size to `[1, MAX_PER_PAGE]`.
pub fn clamp_per_page(per_page: Option<i64>) -> i64 {
    per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE)
}

/// Clamp a user-provided page number to at least 1.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

/// Number of rows to skip for the given page.
pub fn offset_for(page: i64, per_page: i64) -> i64 {
    (page - 1).saturating_mul(per_page)
}

/// Cut one page out of an already filtered, ordered list.
pub fn page_slice<T>(items: Vec<T>, page: i64, per_page: i64) -> Vec<T> {
    let offset = usize::try_from(offset_for(page, per_page)).unwrap_or(usize::MAX);
    let per_page = usize::try_from(per_page).unwrap_or(0);
    items.into_iter().skip(offset).take(per_page).collect()
}

/// Pagination metadata returned next to a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PageInfo {
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        let total_pages = if total <= 0 {
            0
        } else {
            (total + per_page - 1) / per_page
        };
        Self {
            page,
            per_page,
            total,
            total_pages,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
