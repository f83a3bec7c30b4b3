//! Configuration for the AI menu-extraction upstream

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Extraction client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Enable/disable the AI extraction upstream globally
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Extraction service URL
    #[serde(default = "default_service_url")]
    pub service_url: String,

    /// API key (read from env EXTRACTION_API_KEY if not set)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum concurrent extraction requests
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_requests: usize,

    /// Number of retry attempts
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: usize,

    /// Base backoff in milliseconds
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Circuit breaker failure threshold
    #[serde(default = "default_breaker_failures")]
    pub circuit_breaker_failures: usize,

    /// Circuit breaker reset timeout in seconds
    #[serde(default = "default_breaker_reset")]
    pub circuit_breaker_reset_secs: u64,
}

// Default value functions
fn default_enabled() -> bool {
    true
}
fn default_service_url() -> String {
    "http://localhost:8080".to_string()
}
fn default_timeout_ms() -> u64 {
    10_000
}
fn default_max_concurrent() -> usize {
    16
}
fn default_retry_attempts() -> usize {
    2
}
fn default_retry_backoff_ms() -> u64 {
    200
}
fn default_breaker_failures() -> usize {
    5
}
fn default_breaker_reset() -> u64 {
    30
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            service_url: default_service_url(),
            api_key: None,
            timeout_ms: default_timeout_ms(),
            max_concurrent_requests: default_max_concurrent(),
            retry_attempts: default_retry_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
            circuit_breaker_failures: default_breaker_failures(),
            circuit_breaker_reset_secs: default_breaker_reset(),
        }
    }
}

impl ExtractionConfig {
    /// Override fields from environment variables where present
    pub fn from_env(mut self) -> Self {
        if let Ok(val) = std::env::var("EXTRACTION_ENABLED") {
            self.enabled = val.to_lowercase() == "true" || val == "1";
        }

        if let Ok(val) = std::env::var("EXTRACTION_SERVICE_URL") {
            self.service_url = val;
        }

        if let Ok(val) = std::env::var("EXTRACTION_API_KEY") {
            self.api_key = Some(val);
        }

        if let Ok(val) = std::env::var("EXTRACTION_TIMEOUT_MS") {
            if let Ok(timeout) = val.parse() {
                self.timeout_ms = timeout;
            }
        }

        if let Ok(val) = std::env::var("EXTRACTION_MAX_CONCURRENT") {
            if let Ok(max) = val.parse() {
                self.max_concurrent_requests = max;
            }
        }

        if let Ok(val) = std::env::var("EXTRACTION_MAX_RETRIES") {
            if let Ok(retries) = val.parse() {
                self.retry_attempts = retries;
            }
        }

        if let Ok(val) = std::env::var("EXTRACTION_RETRY_BACKOFF_MS") {
            if let Ok(ms) = val.parse() {
                self.retry_backoff_ms = ms;
            }
        }

        if let Ok(val) = std::env::var("EXTRACTION_CIRCUIT_THRESHOLD") {
            if let Ok(threshold) = val.parse() {
                self.circuit_breaker_failures = threshold;
            }
        }

        if let Ok(val) = std::env::var("EXTRACTION_CIRCUIT_COOLDOWN_SECS") {
            if let Ok(secs) = val.parse() {
                self.circuit_breaker_reset_secs = secs;
            }
        }

        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn breaker_reset_timeout(&self) -> Duration {
        Duration::from_secs(self.circuit_breaker_reset_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExtractionConfig::default();
        assert!(config.enabled);
        assert_eq!(config.service_url, "http://localhost:8080");
        assert_eq!(config.timeout_ms, 10_000);
        assert_eq!(config.retry_attempts, 2);
    }

    #[test]
    fn test_duration_conversions() {
        let config = ExtractionConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(10_000));
        assert_eq!(config.retry_backoff(), Duration::from_millis(200));
        assert_eq!(config.breaker_reset_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_config_from_env() {
        std::env::set_var("EXTRACTION_ENABLED", "false");
        std::env::set_var("EXTRACTION_SERVICE_URL", "http://custom:9000");
        std::env::set_var("EXTRACTION_API_KEY", "test-key");

        let config = ExtractionConfig::default().from_env();

        assert!(!config.enabled);
        assert_eq!(config.service_url, "http://custom:9000");
        assert_eq!(config.api_key, Some("test-key".to_string()));

        std::env::remove_var("EXTRACTION_ENABLED");
        std::env::remove_var("EXTRACTION_SERVICE_URL");
        std::env::remove_var("EXTRACTION_API_KEY");
    }
}
