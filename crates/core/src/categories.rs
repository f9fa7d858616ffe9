//! Category label handling.
//!
//! A record's `category` column holds one or more labels separated by commas
//! (`"Health, Education"`). Requests name categories the same way. Both sides
//! are split with the same rules so a label compares equal regardless of the
//! whitespace around it.

use crate::types::DbId;

/// Separator between labels, both in stored rows and in request paths.
pub const LABEL_SEPARATOR: char = ',';

// ---------------------------------------------------------------------------
// Record abstraction
// ---------------------------------------------------------------------------

/// A stored record that carries a comma-separated category list.
///
/// Implemented by the database row type so the query engine and renderer can
/// work without depending on sqlx.
pub trait CategorizedRecord {
    fn id(&self) -> DbId;
    fn title(&self) -> &str;
    fn link(&self) -> &str;
    fn category(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Split a requested category list into trimmed, non-empty labels.
///
/// Order is preserved and repeated labels are kept; callers that need
/// distinct labels deduplicate themselves.
pub fn split_labels(input: &str) -> Vec<&str> {
    input
        .split(LABEL_SEPARATOR)
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .collect()
}

/// Iterate over the trimmed labels stored in a row's `category` field.
pub fn row_labels(category: &str) -> impl Iterator<Item = &str> {
    category.split(LABEL_SEPARATOR).map(str::trim)
}

/// Whether `label` is one of the labels in `category`, compared verbatim
/// after trimming.
///
/// This is the membership re-check applied after the substring pre-filter:
/// `"Art"` is a substring of `"Martial Arts"` but not a member of it.
pub fn has_label(category: &str, label: &str) -> bool {
    let label = label.trim();
    !label.is_empty() && row_labels(category).any(|candidate| candidate == label)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
