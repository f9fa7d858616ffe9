//! Repository for the `preferences` table.

use async_trait::async_trait;
use preferences_core::query::CategorySource;
use preferences_core::types::DbId;
use sqlx::PgPool;

use crate::escape_like;
use crate::models::preference::{CreatePreference, Preference};

/// Unqualified table name.
pub const TABLE_NAME: &str = "preferences";

/// Column list for preferences queries.
const COLUMNS: &str = "id, title, link, category";

/// A configured schema override is not a plain SQL identifier.
#[derive(Debug, thiserror::Error)]
#[error("Invalid table schema '{0}': expected letters, digits and underscores, not starting with a digit")]
pub struct InvalidSchemaName(pub String);

/// Insert and read operations for preferences.
///
/// Holds the pool and the (optionally schema-qualified) table name, so it is
/// built once at startup and cloned into handlers.
#[derive(Debug, Clone)]
pub struct PreferenceRepo {
    pool: PgPool,
    table: String,
}

impl PreferenceRepo {
    /// Repository over `preferences` in the connection's default schema.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            table: TABLE_NAME.to_string(),
        }
    }

    /// Repository over `<schema>.preferences`, or the default schema when
    /// `schema` is `None`.
    ///
    /// The schema is interpolated into SQL, so anything other than a plain
    /// identifier is rejected.
    pub fn with_schema(pool: PgPool, schema: Option<&str>) -> Result<Self, InvalidSchemaName> {
        match schema {
            None => Ok(Self::new(pool)),
            Some(schema) if is_plain_identifier(schema) => Ok(Self {
                pool,
                table: format!("{schema}.{TABLE_NAME}"),
            }),
            Some(schema) => Err(InvalidSchemaName(schema.to_string())),
        }
    }

    /// The table name used in queries.
    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Confirm the configured table exists and is readable.
    ///
    /// Bundled migrations only create the table in the default schema, so an
    /// override schema must already hold it.
    pub async fn ensure_table(&self) -> Result<(), sqlx::Error> {
        let query = format!("SELECT 1 FROM {} LIMIT 1", self.table);
        sqlx::query(&query).execute(&self.pool).await?;
        Ok(())
    }

    /// Insert a new preference, returning the stored row with its id.
    pub async fn create(&self, input: &CreatePreference) -> Result<Preference, sqlx::Error> {
        let query = format!(
            "INSERT INTO {} (title, link, category)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}",
            self.table
        );
        sqlx::query_as::<_, Preference>(&query)
            .bind(&input.title)
            .bind(&input.link)
            .bind(&input.category)
            .fetch_one(&self.pool)
            .await
    }

    /// Find a preference by its ID.
    pub async fn find_by_id(&self, id: DbId) -> Result<Option<Preference>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {} WHERE id = $1", self.table);
        sqlx::query_as::<_, Preference>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Rows whose whole `category` value equals `category`.
    ///
    /// This does not understand multi-valued categories; label lookups go
    /// through [`preferences_core::query`] instead.
    pub async fn find_by_exact_category(
        &self,
        category: &str,
    ) -> Result<Vec<Preference>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {} WHERE category = $1 ORDER BY id ASC",
            self.table
        );
        sqlx::query_as::<_, Preference>(&query)
            .bind(category)
            .fetch_all(&self.pool)
            .await
    }

    /// Rows whose `category` contains `fragment` anywhere (case-sensitive).
    ///
    /// Over-inclusive: callers re-check label membership.
    pub async fn find_by_category_substring(
        &self,
        fragment: &str,
    ) -> Result<Vec<Preference>, sqlx::Error> {
        let pattern = format!("%{}%", escape_like(fragment));
        let query = format!(
            "SELECT {COLUMNS} FROM {} WHERE category LIKE $1 ESCAPE '\\' ORDER BY id ASC",
            self.table
        );
        let rows = sqlx::query_as::<_, Preference>(&query)
            .bind(&pattern)
            .fetch_all(&self.pool)
            .await?;
        tracing::debug!(fragment, candidates = rows.len(), "Category substring lookup");
        Ok(rows)
    }

    /// One page of all preferences, ordered by id.
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Preference>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {} ORDER BY id ASC LIMIT $1 OFFSET $2",
            self.table
        );
        sqlx::query_as::<_, Preference>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
    }

    /// Total number of preferences.
    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM {}", self.table);
        sqlx::query_scalar::<_, i64>(&query)
            .fetch_one(&self.pool)
            .await
    }
}

#[async_trait]
impl CategorySource<Preference> for PreferenceRepo {
    type Error = sqlx::Error;

    async fn find_by_category_substring(
        &self,
        fragment: &str,
    ) -> Result<Vec<Preference>, Self::Error> {
        PreferenceRepo::find_by_category_substring(self, fragment).await
    }
}

fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
