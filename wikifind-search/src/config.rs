//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] controls the debounce window, the fetch deadline, result
//! and cache limits, the typo tolerance and how the API is reached. The
//! defaults match the behaviour the interactive client was tuned for.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Placeholder substituted with the language tag in [`SearchConfig::api_endpoint`].
pub const LANGUAGE_PLACEHOLDER: &str = "{lang}";

/// Configuration for the search pipeline.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet window in milliseconds before a scheduled search runs.
    pub debounce_ms: u64,
    /// Deadline for the whole fetch chain, in seconds.
    pub timeout_seconds: u64,
    /// Maximum number of ranked results delivered.
    pub max_results: usize,
    /// `limit` sent to the prefix and full-text endpoints.
    pub fetch_limit: usize,
    /// Maximum edit distance for suggestions and typo scoring.
    pub typo_tolerance: usize,
    /// Maximum number of cached payloads.
    pub cache_capacity: usize,
    /// Age in seconds after which a cached payload is ignored.
    pub cache_ttl_seconds: u64,
    /// API endpoint template; `{lang}` is replaced by the language tag.
    pub api_endpoint: String,
    /// Article URL template; `{lang}` is replaced by the language tag and the
    /// percent-encoded title is appended.
    pub article_base: String,
    /// User-Agent sent with every request. Wikimedia asks clients to identify themselves.
    pub user_agent: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            timeout_seconds: 30,
            max_results: 15,
            fetch_limit: 15,
            typo_tolerance: 2,
            cache_capacity: 100,
            cache_ttl_seconds: 24 * 60 * 60,
            api_endpoint: "https://{lang}.wikipedia.org/w/api.php".to_owned(),
            article_base: "https://{lang}.wikipedia.org/wiki/".to_owned(),
            user_agent: concat!(
                "wikifind/",
                env!("CARGO_PKG_VERSION"),
                " (interactive encyclopedia search client)"
            )
            .to_owned(),
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `timeout_seconds`, `max_results`, `fetch_limit` and `cache_capacity` must be > 0
    /// - `debounce_ms` must be shorter than the timeout
    /// - `api_endpoint` must contain `{lang}`
    /// - `user_agent` must not be empty
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.max_results == 0 {
            return Err(SearchError::Config(
                "max_results must be greater than 0".into(),
            ));
        }
        if self.fetch_limit == 0 {
            return Err(SearchError::Config(
                "fetch_limit must be greater than 0".into(),
            ));
        }
        if self.cache_capacity == 0 {
            return Err(SearchError::Config(
                "cache_capacity must be greater than 0".into(),
            ));
        }
        if self.debounce() >= self.timeout() {
            return Err(SearchError::Config(
                "debounce_ms must be shorter than timeout_seconds".into(),
            ));
        }
        if !self.api_endpoint.contains(LANGUAGE_PLACEHOLDER) {
            return Err(SearchError::Config(format!(
                "api_endpoint must contain {LANGUAGE_PLACEHOLDER}"
            )));
        }
        if self.user_agent.trim().is_empty() {
            return Err(SearchError::Config("user_agent must not be empty".into()));
        }
        Ok(())
    }

    /// The debounce quiet window.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// The fetch-chain deadline.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// How long a cached payload stays fresh.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sensible_values() {
        let config = SearchConfig::default();
        assert_eq!(config.debounce_ms, 300);
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.max_results, 15);
        assert_eq!(config.fetch_limit, 15);
        assert_eq!(config.typo_tolerance, 2);
        assert_eq!(config.cache_capacity, 100);
        assert_eq!(config.cache_ttl_seconds, 86_400);
        assert!(config.user_agent.starts_with("wikifind/"));
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(SearchConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = SearchConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_seconds"));
    }

    #[test]
    fn zero_max_results_rejected() {
        let config = SearchConfig {
            max_results: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_results"));
    }

    #[test]
    fn zero_cache_capacity_rejected() {
        let config = SearchConfig {
            cache_capacity: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("cache_capacity"));
    }

    #[test]
    fn debounce_longer_than_timeout_rejected() {
        let config = SearchConfig {
            debounce_ms: 5_000,
            timeout_seconds: 5,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("debounce_ms"));
    }

    #[test]
    fn endpoint_without_placeholder_rejected() {
        let config = SearchConfig {
            api_endpoint: "https://en.wikipedia.org/w/api.php".into(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("api_endpoint"));
    }

    #[test]
    fn durations_follow_fields() {
        let config = SearchConfig::default();
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.cache_ttl(), Duration::from_secs(86_400));
    }

    #[test]
    fn partial_config_uses_defaults() {
        let config: SearchConfig =
            serde_json::from_str(r#"{"timeout_seconds": 10}"#).expect("deserialize");
        assert_eq!(config.timeout_seconds, 10);
        assert_eq!(config.debounce_ms, 300);
    }
}
