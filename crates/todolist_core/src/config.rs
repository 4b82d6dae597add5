//! Remote API configuration.
//!
//! # Responsibility
//! - Resolve the GraphQL endpoint and request timeout.
//! - Reject malformed values before any client is built.
//!
//! # Invariants
//! - `api_url` parses as a URL with an `http` or `https` scheme and a host.
//! - `request_timeout` is never zero.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use url::Url;

/// Environment variable holding the GraphQL endpoint URL.
pub const API_URL_ENV: &str = "TODOLIST_API_URL";
/// Environment variable holding the request timeout in milliseconds.
pub const API_TIMEOUT_ENV: &str = "TODOLIST_API_TIMEOUT_MS";

pub const DEFAULT_API_URL: &str = "http://localhost:4000/graphql";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Configuration parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyApiUrl,
    InvalidUrl { url: String, message: String },
    UnsupportedScheme(String),
    InvalidTimeout(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyApiUrl => write!(f, "api url cannot be empty"),
            Self::InvalidUrl { url, message } => write!(f, "invalid api url `{url}`: {message}"),
            Self::UnsupportedScheme(url) => {
                write!(f, "api url must start with http:// or https://, got `{url}`")
            }
            Self::InvalidTimeout(value) => write!(
                f,
                "request timeout must be a positive number of milliseconds, got `{value}`"
            ),
        }
    }
}

impl Error for ConfigError {}

/// Settings for the GraphQL HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl ClientConfig {
    /// Builds a config for `api_url` with the default timeout.
    pub fn new(api_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: normalize_api_url(api_url)?,
            ..Self::default()
        })
    }

    /// Returns a copy with another request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ConfigError> {
        if timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout("0".to_string()));
        }
        self.request_timeout = timeout;
        Ok(self)
    }

    /// Reads `TODOLIST_API_URL` and `TODOLIST_API_TIMEOUT_MS`.
    ///
    /// Unset or blank variables fall back to defaults; set but malformed
    /// values are errors.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = match non_blank(lookup(API_URL_ENV)) {
            Some(raw) => normalize_api_url(&raw)?,
            None => DEFAULT_API_URL.to_string(),
        };
        let request_timeout = match non_blank(lookup(API_TIMEOUT_ENV)) {
            Some(raw) => parse_timeout_ms(&raw)?,
            None => Duration::from_millis(DEFAULT_TIMEOUT_MS),
        };

        Ok(Self {
            api_url,
            request_timeout,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|raw| !raw.trim().is_empty())
}

fn normalize_api_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyApiUrl);
    }
    let parsed = Url::parse(trimmed).map_err(|err| ConfigError::InvalidUrl {
        url: trimmed.to_string(),
        message: err.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme(trimmed.to_string()));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::InvalidUrl {
            url: trimmed.to_string(),
            message: "missing host".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

fn parse_timeout_ms(raw: &str) -> Result<Duration, ConfigError> {
    let trimmed = raw.trim();
    match trimmed.parse::<u64>() {
        Ok(0) | Err(_) => Err(ConfigError::InvalidTimeout(trimmed.to_string())),
        Ok(ms) => Ok(Duration::from_millis(ms)),
    }
}
