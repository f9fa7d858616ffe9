//! Category query engine.
//!
//! The `category` column is a comma-separated set, which SQL cannot test for
//! membership directly. Lookups therefore run in two phases:
//!
//! 1. a substring `LIKE` query in the store, cheap but over-inclusive;
//! 2. an in-process membership re-check with [`has_label`], which drops rows
//!    where the label only appears inside a longer label.
//!
//! [`group_by_categories`] applies this per requested label and assembles the
//! ordered groups the renderer turns into tables.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::categories::{has_label, split_labels, CategorizedRecord};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Store seam
// ---------------------------------------------------------------------------

/// Read access the engine needs from the record store.
#[async_trait]
pub trait CategorySource<R: Send>: Send + Sync {
    type Error: Send;

    /// Rows whose `category` contains `fragment` anywhere, case-sensitive.
    async fn find_by_category_substring(&self, fragment: &str) -> Result<Vec<R>, Self::Error>;
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Records matching one requested label.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup<R> {
    pub label: String,
    pub records: Vec<R>,
}

/// Outcome of a multi-category lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryQueryResult<R> {
    /// Non-empty groups in the order their labels were requested.
    pub groups: Vec<CategoryGroup<R>>,
    /// Number of distinct records across all groups.
    pub total_records: usize,
    /// Every non-empty requested label, as given, whether or not it matched.
    pub categories_found: Vec<String>,
}

impl<R> CategoryQueryResult<R> {
    /// Number of requested labels that produced at least one record.
    pub fn matched_labels(&self) -> usize {
        self.groups.len()
    }

    /// Number of distinct labels requested.
    pub fn requested_labels(&self) -> usize {
        self.categories_found
            .iter()
            .map(String::as_str)
            .collect::<HashSet<_>>()
            .len()
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Find the records that carry `label` as one of their categories.
///
/// Store order is preserved. A label containing NUL never matches: text
/// columns cannot hold it, so the store is not asked.
pub async fn find_members<R, S>(source: &S, label: &str) -> Result<Vec<R>, S::Error>
where
    R: CategorizedRecord + Send,
    S: CategorySource<R> + ?Sized,
{
    let label = label.trim();
    if label.is_empty() || label.contains('\0') {
        return Ok(Vec::new());
    }

    let candidates = source.find_by_category_substring(label).await?;
    Ok(candidates
        .into_iter()
        .filter(|record| has_label(record.category(), label))
        .collect())
}

/// Look up every label in a comma-separated list and group the matches.
///
/// A label repeated in the input is looked up once, at its first position,
/// but still echoed in `categories_found`. Records are deduplicated by id for
/// `total_records`; a record under two labels stays in both groups.
pub async fn group_by_categories<R, S>(
    source: &S,
    input: &str,
) -> Result<CategoryQueryResult<R>, S::Error>
where
    R: CategorizedRecord + Send,
    S: CategorySource<R> + ?Sized,
{
    let labels = split_labels(input);

    let mut seen_labels: HashSet<&str> = HashSet::new();
    let mut seen_records: HashSet<DbId> = HashSet::new();
    let mut groups = Vec::new();

    for label in labels.iter().copied() {
        if !seen_labels.insert(label) {
            continue;
        }

        let records = find_members(source, label).await?;
        if records.is_empty() {
            continue;
        }

        seen_records.extend(records.iter().map(CategorizedRecord::id));
        groups.push(CategoryGroup {
            label: label.to_string(),
            records,
        });
    }

    Ok(CategoryQueryResult {
        groups,
        total_records: seen_records.len(),
        categories_found: labels.into_iter().map(str::to_string).collect(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use assert_matches::assert_matches;

    use super::*;

    /// Minimal record used by the engine and renderer tests.
    #[derive(Debug, Clone, PartialEq)]
    pub(crate) struct Row {
        pub id: DbId,
        pub title: String,
        pub link: String,
        pub category: String,
    }

    pub(crate) fn row(id: DbId, title: &str, category: &str) -> Row {
        Row {
            id,
            title: title.to_string(),
            link: format!("https://example.com/{id}"),
            category: category.to_string(),
        }
    }

    impl CategorizedRecord for Row {
        fn id(&self) -> DbId {
            self.id
        }
        fn title(&self) -> &str {
            &self.title
        }
        fn link(&self) -> &str {
            &self.link
        }
        fn category(&self) -> &str {
            &self.category
        }
    }

    /// In-memory store that records which fragments were queried.
    struct MemorySource {
        rows: Vec<Row>,
        queried: Mutex<Vec<String>>,
    }

    impl MemorySource {
        fn new(rows: Vec<Row>) -> Self {
            Self {
                rows,
                queried: Mutex::new(Vec::new()),
            }
        }

        fn queried(&self) -> Vec<String> {
            self.queried.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CategorySource<Row> for MemorySource {
        type Error = std::convert::Infallible;

        async fn find_by_category_substring(&self, fragment: &str) -> Result<Vec<Row>, Self::Error> {
            self.queried.lock().unwrap().push(fragment.to_string());
            Ok(self
                .rows
                .iter()
                .filter(|r| r.category.contains(fragment))
                .cloned()
                .collect())
        }
    }

    /// Store whose every query fails.
    struct FailingSource;

    #[async_trait]
    impl CategorySource<Row> for FailingSource {
        type Error = &'static str;

        async fn find_by_category_substring(&self, _: &str) -> Result<Vec<Row>, Self::Error> {
            Err("connection lost")
        }
    }

    fn titles(group: &CategoryGroup<Row>) -> Vec<&str> {
        group.records.iter().map(|r| r.title.as_str()).collect()
    }

    // -- find_members ------------------------------------------------------

    #[tokio::test]
    async fn find_members_drops_substring_false_positives() {
        let source = MemorySource::new(vec![
            row(1, "Dojo", "Martial Arts"),
            row(2, "Gallery", "Art, Culture"),
        ]);

        let members = find_members(&source, "Art").await.unwrap();

        assert_eq!(members, vec![row(2, "Gallery", "Art, Culture")]);
    }

    #[tokio::test]
    async fn find_members_skips_store_for_blank_label() {
        let source = MemorySource::new(vec![row(1, "A", "Health")]);

        let members = find_members(&source, "   ").await.unwrap();

        assert!(members.is_empty());
        assert!(source.queried().is_empty());
    }

    #[tokio::test]
    async fn find_members_skips_store_for_label_with_nul() {
        let source = MemorySource::new(vec![row(1, "A", "Health")]);

        let members = find_members(&source, "Health\0").await.unwrap();

        assert!(members.is_empty());
        assert!(source.queried().is_empty());
    }

    #[tokio::test]
    async fn label_with_nul_is_echoed_but_not_queried() {
        let source = MemorySource::new(vec![row(1, "A", "Health")]);

        let result = group_by_categories(&source, "He\0alth, Health").await.unwrap();

        assert_eq!(result.groups.len(), 1);
        assert_eq!(result.groups[0].label, "Health");
        assert_eq!(result.categories_found, vec!["He\0alth", "Health"]);
        assert_eq!(source.queried(), vec!["Health"]);
    }

    // -- group_by_categories -----------------------------------------------

    #[tokio::test]
    async fn omits_labels_without_matches() {
        let source = MemorySource::new(vec![
            row(1, "A", "Health"),
            row(2, "B", "Martial Arts"),
        ]);

        let result = group_by_categories(&source, "Health, Art").await.unwrap();

        assert_eq!(result.groups.len(), 1);
        assert_eq!(result.groups[0].label, "Health");
        assert_eq!(titles(&result.groups[0]), vec!["A"]);
        assert_eq!(result.total_records, 1);
        assert_eq!(result.categories_found, vec!["Health", "Art"]);
    }

    #[tokio::test]
    async fn matches_member_of_multi_valued_category() {
        let source = MemorySource::new(vec![row(1, "Clinic", "Health, Education")]);

        let result = group_by_categories(&source, "Education").await.unwrap();

        assert_eq!(result.groups.len(), 1);
        assert_eq!(titles(&result.groups[0]), vec!["Clinic"]);
    }

    #[tokio::test]
    async fn record_in_two_groups_is_counted_once() {
        let source = MemorySource::new(vec![
            row(1, "Both", "Health, Education"),
            row(2, "School", "Education"),
        ]);

        let result = group_by_categories(&source, "Health,Education").await.unwrap();

        assert_eq!(result.groups.len(), 2);
        assert_eq!(titles(&result.groups[0]), vec!["Both"]);
        assert_eq!(titles(&result.groups[1]), vec!["Both", "School"]);
        assert_eq!(result.total_records, 2);
    }

    #[tokio::test]
    async fn groups_follow_requested_label_order() {
        let source = MemorySource::new(vec![
            row(1, "A", "Alpha"),
            row(2, "B", "Beta"),
        ]);

        let result = group_by_categories(&source, "Beta, Alpha").await.unwrap();

        let labels: Vec<&str> = result.groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["Beta", "Alpha"]);
    }

    #[tokio::test]
    async fn echoes_labels_even_when_nothing_matches() {
        let source = MemorySource::new(Vec::new());

        let result = group_by_categories(&source, " Music ,Film").await.unwrap();

        assert!(result.groups.is_empty());
        assert_eq!(result.total_records, 0);
        assert_eq!(result.categories_found, vec!["Music", "Film"]);
    }

    #[tokio::test]
    async fn empty_labels_are_not_queried_or_echoed() {
        let source = MemorySource::new(vec![row(1, "A", "Health")]);

        let result = group_by_categories(&source, "Health,, ,").await.unwrap();

        assert_eq!(result.categories_found, vec!["Health"]);
        assert_eq!(source.queried(), vec!["Health"]);
    }

    #[tokio::test]
    async fn repeated_label_is_queried_once_but_echoed_twice() {
        let source = MemorySource::new(vec![row(1, "A", "Health")]);

        let result = group_by_categories(&source, "Health, Health").await.unwrap();

        assert_eq!(result.groups.len(), 1);
        assert_eq!(result.total_records, 1);
        assert_eq!(result.categories_found, vec!["Health", "Health"]);
        assert_eq!(result.requested_labels(), 1);
        assert_eq!(source.queried(), vec!["Health"]);
    }

    #[tokio::test]
    async fn duplicate_rows_with_distinct_ids_count_separately() {
        let source = MemorySource::new(vec![
            row(1, "Same", "Health"),
            row(2, "Same", "Health"),
        ]);

        let result = group_by_categories(&source, "Health").await.unwrap();

        assert_eq!(result.total_records, 2);
    }

    #[tokio::test]
    async fn store_errors_propagate() {
        let result = group_by_categories(&FailingSource, "Health").await;

        assert_matches!(result, Err("connection lost"));
    }
}
