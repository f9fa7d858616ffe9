//! Preference model and create DTO.

use preferences_core::categories::CategorizedRecord;
use preferences_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::borrow::Cow;

use validator::{Validate, ValidationError};

/// A row from the `preferences` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Preference {
    pub id: DbId,
    pub title: String,
    pub link: String,
    /// One or more labels separated by commas.
    pub category: String,
}

impl CategorizedRecord for Preference {
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

/// DTO for creating a preference.
///
/// Missing fields deserialize to empty strings so they surface as field-level
/// validation errors rather than body parse failures. Length bounds match the
/// column widths. PostgreSQL text cannot hold NUL, so it is rejected here
/// instead of failing the insert.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreatePreference {
    #[serde(default)]
    #[validate(
        length(min = 1, max = 500, message = "title is required and must be at most 500 characters"),
        custom(function = "reject_nul")
    )]
    pub title: String,

    #[serde(default)]
    #[validate(
        length(min = 1, max = 1000, message = "link is required and must be at most 1000 characters"),
        custom(function = "reject_nul")
    )]
    pub link: String,

    #[serde(default)]
    #[validate(
        length(min = 1, max = 150, message = "category is required and must be at most 150 characters"),
        custom(function = "reject_nul")
    )]
    pub category: String,
}

fn reject_nul(value: &str) -> Result<(), ValidationError> {
    if value.contains('\0') {
        return Err(ValidationError::new("nul_character")
            .with_message(Cow::Borrowed("must not contain NUL characters")));
    }
    Ok(())
}
