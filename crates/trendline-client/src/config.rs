//! Trendline client configuration.
//!
//! Defaults point at a server on the local machine. Override via
//! environment variables or explicit construction.

use url::Url;

/// Default server address.
pub const DEFAULT_URL: &str = "http://127.0.0.1:8080";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for connecting to a Trendline server.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server origin. API routes and share links are resolved against it.
    pub base_url: Url,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl ClientConfig {
    /// Configuration for `base_url` with the default timeout.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_url("base_url", base_url)?,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `TRENDLINE_URL` (default: `http://127.0.0.1:8080`)
    /// - `TRENDLINE_TIMEOUT_SECS` (default: 10)
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = std::env::var("TRENDLINE_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());
        let timeout_secs = match std::env::var("TRENDLINE_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(raw))?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };
        Ok(Self {
            base_url: parse_url("TRENDLINE_URL", &raw)?,
            timeout_secs,
        })
    }
}

fn parse_url(var: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl(
            var.to_string(),
            format!("{raw} cannot be used as a base URL"),
        ));
    }
    Ok(with_trailing_slash(url))
}

/// Ensure the path ends in `/` so relative joins keep every base segment:
/// `https://host/trendline` + `api/project` must not drop `trendline`.
pub(crate) fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid TRENDLINE_TIMEOUT_SECS: {0:?}")]
    InvalidTimeout(String),
}
