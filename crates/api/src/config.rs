use axum::http::HeaderValue;
use preferences_core::credentials::{CredentialSet, DEFAULT_API_USER};
use preferences_db::DEFAULT_MAX_CONNECTIONS;

/// Errors raised while reading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Server configuration loaded from environment variables.
///
/// Everything except the database URL and the API token has a default
/// suitable for local development.
#[derive(Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<HeaderValue>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Maximum pooled database connections (default: `10`).
    pub db_max_connections: u32,
    /// Apply bundled migrations on startup (default: `true`).
    pub run_migrations: bool,
    /// Schema holding the preferences table, if not the default one.
    pub table_schema: Option<String>,
    /// The static API key callers must present.
    pub api_token: String,
    /// Identity the API key resolves to (default: `appuser`).
    pub api_user: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `DATABASE_URL`         | required                   |
    /// | `API_TOKEN`            | required                   |
    /// | `API_USER`             | `appuser`                  |
    /// | `TABLE_SCHEMA`         | unset                      |
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `5000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5000`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `DB_MAX_CONNECTIONS`   | `10`                       |
    /// | `RUN_MIGRATIONS`       | `true`                     |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset.
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_or("PORT", var("PORT"), 5000u16)?;

        let cors_origins = var("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5000".into())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|origin| {
                origin.parse::<HeaderValue>().map_err(|e| ConfigError::Invalid {
                    name: "CORS_ORIGINS",
                    value: origin.to_string(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let request_timeout_secs = parse_or("REQUEST_TIMEOUT_SECS", var("REQUEST_TIMEOUT_SECS"), 30u64)?;
        let db_max_connections =
            parse_or("DB_MAX_CONNECTIONS", var("DB_MAX_CONNECTIONS"), DEFAULT_MAX_CONNECTIONS)?;
        let run_migrations = parse_or("RUN_MIGRATIONS", var("RUN_MIGRATIONS"), true)?;

        let database_url = var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let api_token = var("API_TOKEN").ok_or(ConfigError::Missing("API_TOKEN"))?;
        let api_user = var("API_USER").unwrap_or_else(|| DEFAULT_API_USER.into());
        let table_schema = var("TABLE_SCHEMA").map(|s| s.trim().to_string());

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database_url,
            db_max_connections,
            run_migrations,
            table_schema,
            api_token,
            api_user,
        })
    }

    /// Build the immutable credential set for the configured key.
    pub fn credentials(&self) -> CredentialSet {
        CredentialSet::single(self.api_token.clone(), self.api_user.clone())
    }
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("cors_origins", &self.cors_origins)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("database_url", &"<redacted>")
            .field("db_max_connections", &self.db_max_connections)
            .field("run_migrations", &self.run_migrations)
            .field("table_schema", &self.table_schema)
            .field("api_token", &"<redacted>")
            .field("api_user", &self.api_user)
            .finish()
    }
}

fn parse_or<T>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
            value,
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| map.get(name).cloned())
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("DATABASE_URL", "postgres://localhost/prefs"),
        ("API_TOKEN", "s3cret"),
    ];

    #[test]
    fn defaults_apply_when_only_required_vars_are_set() {
        let config = load(&REQUIRED).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.cors_origins, vec![HeaderValue::from_static("http://localhost:5000")]);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.db_max_connections, DEFAULT_MAX_CONNECTIONS);
        assert!(config.run_migrations);
        assert_eq!(config.table_schema, None);
        assert_eq!(config.api_user, "appuser");
    }

    #[test]
    fn missing_token_is_an_error() {
        let result = load(&[("DATABASE_URL", "postgres://localhost/prefs")]);
        assert_matches!(result, Err(ConfigError::Missing("API_TOKEN")));
    }

    #[test]
    fn blank_token_counts_as_missing() {
        let result = load(&[("DATABASE_URL", "postgres://x"), ("API_TOKEN", "   ")]);
        assert_matches!(result, Err(ConfigError::Missing("API_TOKEN")));
    }

    #[test]
    fn missing_database_url_is_an_error() {
        let result = load(&[("API_TOKEN", "s3cret")]);
        assert_matches!(result, Err(ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn invalid_port_is_reported_with_its_value() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("PORT", "eighty"));

        let result = load(&vars);

        assert_matches!(
            result,
            Err(ConfigError::Invalid { name: "PORT", ref value, .. }) if value == "eighty"
        );
    }

    #[test]
    fn overrides_are_parsed() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("PORT", "8080"),
            ("API_USER", "assistant"),
            ("TABLE_SCHEMA", " tenant_a "),
            ("CORS_ORIGINS", "https://a.example, https://b.example,"),
            ("RUN_MIGRATIONS", "false"),
        ]);

        let config = load(&vars).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.api_user, "assistant");
        assert_eq!(config.table_schema.as_deref(), Some("tenant_a"));
        assert_eq!(config.cors_origins.len(), 2);
        assert!(!config.run_migrations);
    }

    #[test]
    fn credentials_resolve_configured_user() {
        let config = load(&REQUIRED).unwrap();
        let creds = config.credentials();
        assert_eq!(creds.verify("s3cret").map(|i| i.username.as_str()), Some("appuser"));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let config = load(&REQUIRED).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("s3cret"));
        assert!(!rendered.contains("postgres://"));
    }
}
