//! Handlers for the preferences table.
//!
//! Every endpoint here requires the API key via [`ApiKeyUser`], which runs
//! before any other extractor so unauthenticated calls never reach the store.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use preferences_core::pagination::{clamp_page, clamp_per_page, offset_for, page_slice, PageInfo};
use preferences_core::query::{find_members, group_by_categories, CategoryGroup, CategoryQueryResult};
use preferences_core::render::{render_tables, summary_message};
use preferences_core::types::DbId;
use preferences_db::models::preference::{CreatePreference, Preference};
use serde::Serialize;
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::auth::ApiKeyUser;
use crate::query::ListPreferencesParams;
use crate::response::PaginatedResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Body of `GET /preferences/category/{categories}`.
#[derive(Debug, Serialize)]
pub struct CategoryLookupResponse {
    /// Escaped HTML: one heading and table per matched label.
    pub table: String,
    pub message: String,
    /// Distinct records across all groups.
    pub total_records: usize,
    /// Requested labels, echoed whether or not they matched.
    pub categories_found: Vec<String>,
    /// The same groups as `table`, as plain data.
    pub groups: Vec<GroupView>,
}

/// One matched label and its records.
#[derive(Debug, Serialize)]
pub struct GroupView {
    pub label: String,
    pub records: Vec<RecordView>,
}

/// The fields of a record a caller needs to display it.
#[derive(Debug, Serialize)]
pub struct RecordView {
    pub id: DbId,
    pub title: String,
    pub link: String,
}

impl From<&CategoryGroup<Preference>> for GroupView {
    fn from(group: &CategoryGroup<Preference>) -> Self {
        GroupView {
            label: group.label.clone(),
            records: group
                .records
                .iter()
                .map(|record| RecordView {
                    id: record.id,
                    title: record.title.clone(),
                    link: record.link.clone(),
                })
                .collect(),
        }
    }
}

impl From<CategoryQueryResult<Preference>> for CategoryLookupResponse {
    fn from(result: CategoryQueryResult<Preference>) -> Self {
        CategoryLookupResponse {
            table: render_tables(&result.groups),
            message: summary_message(&result),
            total_records: result.total_records,
            groups: result.groups.iter().map(GroupView::from).collect(),
            categories_found: result.categories_found,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /preferences/category/{categories}
///
/// Look up records for a comma-separated list of category labels and return
/// them grouped per label, rendered and structured.
pub async fn get_by_categories(
    user: ApiKeyUser,
    State(state): State<AppState>,
    Path(categories): Path<String>,
) -> AppResult<Json<CategoryLookupResponse>> {
    let result = group_by_categories(&state.repo, &categories).await?;

    tracing::debug!(
        user = %user.username,
        requested = result.categories_found.len(),
        matched = result.matched_labels(),
        total_records = result.total_records,
        "Category lookup"
    );

    Ok(Json(CategoryLookupResponse::from(result)))
}

/// GET /preferences
///
/// One page of records, optionally restricted to a single category label.
pub async fn list_preferences(
    _user: ApiKeyUser,
    State(state): State<AppState>,
    params: Result<Query<ListPreferencesParams>, QueryRejection>,
) -> AppResult<Json<PaginatedResponse<Preference>>> {
    let Query(params) = params?;
    let page = clamp_page(params.page);
    let per_page = clamp_per_page(params.per_page);

    let label = params
        .category
        .as_deref()
        .map(str::trim)
        .filter(|label| !label.is_empty());

    let (data, total) = match label {
        Some(label) => {
            let members = find_members(&state.repo, label).await?;
            let total = i64::try_from(members.len()).unwrap_or(i64::MAX);
            (page_slice(members, page, per_page), total)
        }
        None => {
            let total = state.repo.count().await?;
            let rows = state.repo.list(per_page, offset_for(page, per_page)).await?;
            (rows, total)
        }
    };

    Ok(Json(PaginatedResponse {
        data,
        pagination: PageInfo::new(page, per_page, total),
    }))
}

/// POST /preferences/create
///
/// Validate and insert one record, echoing the stored row with status 201.
pub async fn create_preference(
    user: ApiKeyUser,
    State(state): State<AppState>,
    payload: Result<Json<CreatePreference>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Preference>)> {
    let Json(input) = payload?;
    input.validate()?;

    let preference = state.repo.create(&input).await?;

    tracing::info!(
        preference_id = preference.id,
        user = %user.username,
        category = %preference.category,
        "Preference created"
    );

    Ok((StatusCode::CREATED, Json(preference)))
}
