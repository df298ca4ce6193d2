//! Tracker configuration.
//!
//! # Environment Variables
//!
//! - `SWEET_HOME_ANALYTICS_URL` (required) - Base URL of the analytics
//!   collector, e.g. `http://localhost:5000/api/analytics`
//! - `SWEET_HOME_TRACKER_TICK_MS` - Time-on-page tick period (default: 1000)

use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_TICK_MS: u64 = 1000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Where tracking data is sent and how often time on page advances.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Collector base URL, always ending in `/`.
    pub endpoint: Url,
    pub tick_interval: Duration,
}

impl TrackerConfig {
    /// Create a configuration for a collector base URL with a one-second tick.
    #[must_use]
    pub fn new(mut endpoint: Url) -> Self {
        if !endpoint.path().ends_with('/') {
            let path = format!("{}/", endpoint.path());
            endpoint.set_path(&path);
        }

        Self {
            endpoint,
            tick_interval: Duration::from_millis(DEFAULT_TICK_MS),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the collector URL is missing or either
    /// variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let raw = std::env::var("SWEET_HOME_ANALYTICS_URL")
            .map_err(|_| ConfigError::MissingEnvVar("SWEET_HOME_ANALYTICS_URL".to_string()))?;
        let endpoint = Url::parse(&raw).map_err(|e| {
            ConfigError::InvalidEnvVar("SWEET_HOME_ANALYTICS_URL".to_string(), e.to_string())
        })?;

        let tick_ms = match std::env::var("SWEET_HOME_TRACKER_TICK_MS") {
            Ok(value) => value
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or_else(|| {
                    ConfigError::InvalidEnvVar(
                        "SWEET_HOME_TRACKER_TICK_MS".to_string(),
                        format!("expected a positive integer, got '{value}'"),
                    )
                })?,
            Err(_) => DEFAULT_TICK_MS,
        };

        Ok(Self {
            tick_interval: Duration::from_millis(tick_ms),
            ..Self::new(endpoint)
        })
    }

    /// URL single interactions are posted to.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint cannot be joined (e.g. a `data:` URL).
    pub fn interaction_url(&self) -> Result<Url, url::ParseError> {
        self.endpoint.join("track-interaction")
    }

    /// URL session aggregates are posted to.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint cannot be joined.
    pub fn session_url(&self) -> Result<Url, url::ParseError> {
        self.endpoint.join("track-session")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_without_trailing_slash_keeps_last_segment() {
        let config = TrackerConfig::new(Url::parse("http://localhost:5000/api/analytics").unwrap());

        assert_eq!(
            config.interaction_url().unwrap().as_str(),
            "http://localhost:5000/api/analytics/track-interaction"
        );
        assert_eq!(
            config.session_url().unwrap().as_str(),
            "http://localhost:5000/api/analytics/track-session"
        );
    }

    #[test]
    fn test_endpoint_with_trailing_slash_is_unchanged() {
        let config =
            TrackerConfig::new(Url::parse("https://collector.example.org/analytics/").unwrap());
        assert_eq!(config.endpoint.path(), "/analytics/");
        assert_eq!(config.tick_interval, Duration::from_secs(1));
    }
}
