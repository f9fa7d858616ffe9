use std::sync::Arc;

use preferences_core::credentials::CredentialSet;
use preferences_db::repositories::{InvalidSchemaName, PreferenceRepo};
use preferences_db::DbPool;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
/// Nothing in it is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    /// Preferences repository (owns the connection pool).
    pub repo: PreferenceRepo,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// API keys accepted by protected endpoints.
    pub credentials: Arc<CredentialSet>,
}

impl AppState {
    /// Assemble state from a connected pool and loaded configuration.
    ///
    /// Fails if the configured table schema is not a plain identifier.
    pub fn new(pool: DbPool, config: ServerConfig) -> Result<Self, InvalidSchemaName> {
        let repo = PreferenceRepo::with_schema(pool, config.table_schema.as_deref())?;
        let credentials = Arc::new(config.credentials());
        Ok(Self {
            repo,
            config: Arc::new(config),
            credentials,
        })
    }

    pub fn pool(&self) -> &DbPool {
        self.repo.pool()
    }
}
