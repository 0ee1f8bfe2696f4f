//! # Server Configuration
//!
//! Environment-driven configuration for the search API.
//!
//! ## Variables
//! ```text
//! ┌─────────────────────┬──────────────────────────┬────────────────────────┐
//! │ Variable            │ Default                  │ Purpose                │
//! ├─────────────────────┼──────────────────────────┼────────────────────────┤
//! │ SCOUT_PORT          │ 8080                     │ Listen port            │
//! │ SCOUT_DATABASE_PATH │ ./scout.db               │ SQLite file path       │
//! │ SCOUT_BASE_URL      │ http://localhost:8080    │ Image URL prefix       │
//! │ SCOUT_API_TOKEN     │ (unset = open access)    │ Bearer token           │
//! │ SCOUT_SEARCH_LIMIT  │ 20                       │ Default result cap     │
//! └─────────────────────┴──────────────────────────┴────────────────────────┘
//! ```

use scout_core::{DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT};
use thiserror::Error;

/// Configuration errors surfaced at startup, before the server binds.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

impl ConfigError {
    fn invalid(key: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Runtime configuration resolved from the environment once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port the HTTP server listens on.
    pub port: u16,
    /// Path to the SQLite database file.
    pub database_path: String,
    /// Absolute URL prefix for serving relative image paths.
    /// Stored without a trailing slash.
    pub base_url: String,
    /// Bearer token required on every request. `None` means open access.
    pub api_token: Option<String>,
    /// Default number of results per search when the caller sends no limit.
    pub search_limit: u32,
}

impl AppConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults suitable for local development.
    pub fn load() -> Result<Self, ConfigError> {
        let port = match std::env::var("SCOUT_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::invalid("SCOUT_PORT", format!("not a port number: {raw}")))?,
            Err(_) => 8080,
        };

        let database_path =
            std::env::var("SCOUT_DATABASE_PATH").unwrap_or_else(|_| "./scout.db".to_string());

        let base_url = std::env::var("SCOUT_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8080".to_string());
        let base_url = Self::validate_base_url(&base_url)?;

        let api_token = std::env::var("SCOUT_API_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());

        let search_limit = match std::env::var("SCOUT_SEARCH_LIMIT") {
            Ok(raw) => {
                let parsed = raw.parse::<u32>().map_err(|_| {
                    ConfigError::invalid("SCOUT_SEARCH_LIMIT", format!("not a number: {raw}"))
                })?;
                if parsed == 0 || parsed > MAX_SEARCH_LIMIT {
                    return Err(ConfigError::invalid(
                        "SCOUT_SEARCH_LIMIT",
                        format!("must be between 1 and {MAX_SEARCH_LIMIT}"),
                    ));
                }
                parsed
            }
            Err(_) => DEFAULT_SEARCH_LIMIT,
        };

        Ok(Self {
            port,
            database_path,
            base_url,
            api_token,
            search_limit,
        })
    }

    /// Base URLs must be absolute (scheme included) and are stored without
    /// a trailing slash so path joins stay predictable.
    fn validate_base_url(raw: &str) -> Result<String, ConfigError> {
        let trimmed = raw.trim();
        if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
            return Err(ConfigError::invalid(
                "SCOUT_BASE_URL",
                format!("must start with http:// or https://, got: {trimmed}"),
            ));
        }
        Ok(trimmed.trim_end_matches('/').to_string())
    }
}
