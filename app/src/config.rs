//! Configuration management for the StudyDesk client.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Unset variables take their default; set but unparsable ones are an error.

use std::env;
use std::time::Duration;
use studydesk_runtime::StoreConfig;
use url::Url;

/// Backend base URL
pub const API_URL_VAR: &str = "STUDYDESK_API_URL";
/// `tracing` filter directives
pub const LOG_VAR: &str = "STUDYDESK_LOG";
/// Capacity of the settled-action broadcast
pub const BROADCAST_CAPACITY_VAR: &str = "STUDYDESK_BROADCAST_CAPACITY";
/// Graceful shutdown timeout in seconds
pub const SHUTDOWN_TIMEOUT_VAR: &str = "STUDYDESK_SHUTDOWN_TIMEOUT_SECS";

const DEFAULT_API_URL: &str = "http://localhost:8080/api/v1";
const DEFAULT_LOG_FILTER: &str = "studydesk=info,studydesk_app=info,studydesk_runtime=warn";
const DEFAULT_BROADCAST_CAPACITY: usize = 64;
const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Configuration errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Variable name
        key: &'static str,
        /// Raw value
        value: String,
    },
}

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Backend base URL
    pub api_url: Url,
    /// `tracing` filter directives (default: info for the client crates)
    pub log_filter: String,
    /// Settled-action broadcast capacity (default: 64)
    pub broadcast_capacity: usize,
    /// Graceful shutdown timeout (default: 30 seconds)
    pub shutdown_timeout: Duration,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a set variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a set variable does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = match lookup(API_URL_VAR) {
            Some(value) => Url::parse(&value).map_err(|_| ConfigError::InvalidValue {
                key: API_URL_VAR,
                value,
            })?,
            None => Url::parse(DEFAULT_API_URL).map_err(|_| ConfigError::InvalidValue {
                key: API_URL_VAR,
                value: DEFAULT_API_URL.to_string(),
            })?,
        };

        Ok(Self {
            api_url,
            log_filter: lookup(LOG_VAR).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            broadcast_capacity: parse_or(
                &lookup,
                BROADCAST_CAPACITY_VAR,
                DEFAULT_BROADCAST_CAPACITY,
            )?,
            shutdown_timeout: Duration::from_secs(parse_or(
                &lookup,
                SHUTDOWN_TIMEOUT_VAR,
                DEFAULT_SHUTDOWN_TIMEOUT_SECS,
            )?),
        })
    }

    /// Store settings derived from this configuration
    #[must_use]
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(self.broadcast_capacity, self.shutdown_timeout)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.api_url.as_str(), DEFAULT_API_URL);
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
        assert_eq!(config.broadcast_capacity, 64);
        assert_eq!(config.shutdown_timeout, Duration::from_secs(30));
    }

    #[test]
    fn reads_every_variable() {
        let config = AppConfig::from_lookup(lookup(&[
            (API_URL_VAR, "https://api.studydesk.io/v2"),
            (LOG_VAR, "debug"),
            (BROADCAST_CAPACITY_VAR, " 8 "),
            (SHUTDOWN_TIMEOUT_VAR, "5"),
        ]))
        .unwrap();

        assert_eq!(config.api_url.host_str(), Some("api.studydesk.io"));
        assert_eq!(config.log_filter, "debug");

        let store = config.store_config();
        assert_eq!(store.broadcast_capacity, 8);
        assert_eq!(store.default_shutdown_timeout, Duration::from_secs(5));
    }

    #[test]
    fn invalid_number_names_variable() {
        let error =
            AppConfig::from_lookup(lookup(&[(BROADCAST_CAPACITY_VAR, "lots")])).unwrap_err();

        assert_eq!(
            error,
            ConfigError::InvalidValue {
                key: BROADCAST_CAPACITY_VAR,
                value: "lots".to_string(),
            }
        );
        assert_eq!(
            error.to_string(),
            "invalid value for STUDYDESK_BROADCAST_CAPACITY: \"lots\""
        );
    }

    #[test]
    fn invalid_url_is_rejected() {
        let error = AppConfig::from_lookup(lookup(&[(API_URL_VAR, "not a url")])).unwrap_err();
        assert!(matches!(error, ConfigError::InvalidValue { key: API_URL_VAR, .. }));
    }
}
