//! Configuration management for the client.

use crate::bulk::BulkFailurePolicy;
use crate::debounce::DEFAULT_DEBOUNCE;
use std::env;
use std::time::Duration;

/// Default backend address.
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Default bound on every remote call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the collection backend
    pub api_base_url: String,
    /// Quiet window for the search box
    pub debounce: Duration,
    /// Timeout applied to each remote call
    pub request_timeout: Duration,
    /// How bulk removals treat failed deletes
    pub bulk_failure_policy: BulkFailurePolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            debounce: DEFAULT_DEBOUNCE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            bulk_failure_policy: BulkFailurePolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup, falling back to defaults for
    /// missing keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_base_url = lookup("SHELF_API_URL").unwrap_or(defaults.api_base_url);
        reqwest::Url::parse(&api_base_url)
            .map_err(|_| ConfigError::InvalidApiUrl(api_base_url.clone()))?;

        let debounce = match lookup("SHELF_DEBOUNCE_MS") {
            Some(value) => parse_millis("SHELF_DEBOUNCE_MS", &value)?,
            None => defaults.debounce,
        };

        let request_timeout = match lookup("SHELF_REQUEST_TIMEOUT_MS") {
            Some(value) => parse_millis("SHELF_REQUEST_TIMEOUT_MS", &value)?,
            None => defaults.request_timeout,
        };
        if request_timeout.is_zero() {
            return Err(ConfigError::InvalidDuration {
                key: "SHELF_REQUEST_TIMEOUT_MS",
                value: "0".to_string(),
            });
        }

        let bulk_failure_policy = match lookup("SHELF_BULK_POLICY") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidBulkPolicy(value))?,
            None => defaults.bulk_failure_policy,
        };

        Ok(Self {
            api_base_url,
            debounce,
            request_timeout,
            bulk_failure_policy,
        })
    }
}

fn parse_millis(key: &'static str, value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse()
        .map(Duration::from_millis)
        .map_err(|_| ConfigError::InvalidDuration {
            key,
            value: value.to_string(),
        })
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid SHELF_API_URL value: {0}")]
    InvalidApiUrl(String),

    #[error("Invalid {key} value: {value}")]
    InvalidDuration { key: &'static str, value: String },

    #[error("Invalid SHELF_BULK_POLICY value: {0} (expected divergent or compensate)")]
    InvalidBulkPolicy(String),
}
