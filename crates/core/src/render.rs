//! HTML rendering of grouped category results.
//!
//! The assistant integration displays the `table` field as markup, so every
//! piece of stored or requested text is escaped before it is embedded.

use crate::categories::CategorizedRecord;
use crate::query::{CategoryGroup, CategoryQueryResult};

/// Message returned when none of the requested labels matched.
pub const NO_MATCHES_MESSAGE: &str = "No records found for the requested categories";

/// Escape text for use in HTML element content and quoted attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Render one label group as a heading followed by a table of links.
pub fn render_group<R: CategorizedRecord>(group: &CategoryGroup<R>) -> String {
    let mut html = format!(
        "<h3>{}</h3><table><thead><tr><th>Title</th></tr></thead><tbody>",
        escape_html(&group.label)
    );
    for record in &group.records {
        html.push_str(&format!(
            "<tr><td><a href=\"{}\" target=\"_blank\">{}</a></td></tr>",
            escape_html(record.link()),
            escape_html(record.title())
        ));
    }
    html.push_str("</tbody></table>");
    html
}

/// Concatenate the rendered blocks of every group, in order.
///
/// Returns an empty string when there are no groups.
pub fn render_tables<R: CategorizedRecord>(groups: &[CategoryGroup<R>]) -> String {
    groups.iter().map(render_group).collect()
}

/// Human-readable summary of a lookup.
pub fn summary_message<R>(result: &CategoryQueryResult<R>) -> String {
    if result.total_records == 0 {
        return NO_MATCHES_MESSAGE.to_string();
    }
    let noun = if result.total_records == 1 {
        "record"
    } else {
        "records"
    };
    format!(
        "Found {} {noun} in {} of {} categories",
        result.total_records,
        result.matched_labels(),
        result.requested_labels()
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
