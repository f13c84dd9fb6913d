//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! AppState holds the project store and the configuration. The store is
//! the only shared resource; handlers never keep records between requests.

use std::path::PathBuf;

use sqlx::PgPool;
use thiserror::Error;

use crate::store::ProjectStore;

// -- Configuration ------------------------------------------------------------

/// Log output format for the server binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Application configuration.
///
/// Custom `Debug` redacts the `database_url`, which usually embeds a password.
#[derive(Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Postgres connection string. `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// Directory holding the single-page app (`index.html` and assets).
    /// `None` disables the catch-all fallback.
    pub static_dir: Option<PathBuf>,
    /// Whether `/metrics` is mounted.
    pub metrics_enabled: bool,
    /// Log output format.
    pub log_format: LogFormat,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[REDACTED]"),
            )
            .field("static_dir", &self.static_dir)
            .field("metrics_enabled", &self.metrics_enabled)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            database_url: None,
            static_dir: None,
            metrics_enabled: true,
            log_format: LogFormat::Text,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `PORT` (default: 8080)
    /// - `DATABASE_URL` (optional)
    /// - `TRENDLINE_STATIC_DIR` (optional)
    /// - `TRENDLINE_METRICS_ENABLED` (default: true)
    /// - `TRENDLINE_LOG_FORMAT` (`text` or `json`, default: text)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match var("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid("PORT", &raw))?,
            None => defaults.port,
        };

        let metrics_enabled = match var("TRENDLINE_METRICS_ENABLED") {
            Some(raw) => parse_bool(&raw)
                .ok_or_else(|| ConfigError::invalid("TRENDLINE_METRICS_ENABLED", &raw))?,
            None => defaults.metrics_enabled,
        };

        let log_format = match var("TRENDLINE_LOG_FORMAT") {
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "text" => LogFormat::Text,
                "json" => LogFormat::Json,
                _ => return Err(ConfigError::invalid("TRENDLINE_LOG_FORMAT", &raw)),
            },
            None => defaults.log_format,
        };

        Ok(Self {
            port,
            database_url: var("DATABASE_URL"),
            static_dir: var("TRENDLINE_STATIC_DIR").map(PathBuf::from),
            metrics_enabled,
            log_format,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable holds a value that cannot be used.
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue {
        /// Variable name.
        var: &'static str,
        /// Rejected value.
        value: String,
    },
}

impl ConfigError {
    fn invalid(var: &'static str, value: &str) -> Self {
        Self::InvalidValue {
            var,
            value: value.to_string(),
        }
    }
}

// -- Application State --------------------------------------------------------

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Project records.
    pub projects: ProjectStore,
    /// Configuration.
    pub config: AppConfig,
}

impl AppState {
    /// In-memory state with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default(), None)
    }

    /// State with the given configuration. The store is Postgres-backed
    /// when a pool is given and in-memory otherwise.
    pub fn with_config(config: AppConfig, db_pool: Option<PgPool>) -> Self {
        let projects = match db_pool {
            Some(pool) => ProjectStore::postgres(pool),
            None => ProjectStore::in_memory(),
        };
        Self { projects, config }
    }

    /// State over an explicit store.
    pub fn with_store(config: AppConfig, projects: ProjectStore) -> Self {
        Self { projects, config }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
