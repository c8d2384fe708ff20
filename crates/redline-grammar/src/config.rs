//! Checker configuration.
//!
//! The checker endpoint and timeout are injected configuration, never
//! module-level state, so tests can point the pipeline at a wiremock
//! server or swap in a mock checker entirely.

use std::time::Duration;

/// Default public LanguageTool endpoint.
pub const DEFAULT_CHECKER_URL: &str = "https://api.languagetool.org";

/// Default language code submitted with every check.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Default timeout for one check call (seconds).
pub const DEFAULT_CHECK_TIMEOUT_SECS: u64 = 30;

/// Configuration for the external grammar checker.
#[derive(Debug, Clone)]
pub struct CheckerConfig {
    /// Base URL of the checker service (no trailing slash).
    pub base_url: String,
    /// Language code, e.g. "en-US".
    pub language: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CHECKER_URL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            timeout: Duration::from_secs(DEFAULT_CHECK_TIMEOUT_SECS),
        }
    }
}

impl CheckerConfig {
    /// Build from environment variables, falling back to defaults.
    ///
    /// Reads `REDLINE_LT_URL`, `REDLINE_LT_LANGUAGE`, and
    /// `REDLINE_LT_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("REDLINE_LT_URL").unwrap_or_else(|_| DEFAULT_CHECKER_URL.to_string());
        let language =
            std::env::var("REDLINE_LT_LANGUAGE").unwrap_or_else(|_| DEFAULT_LANGUAGE.to_string());
        let timeout_secs = std::env::var("REDLINE_LT_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_CHECK_TIMEOUT_SECS);

        Self {
            base_url,
            language,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Set the base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the language code.
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CheckerConfig::default();
        assert_eq!(config.base_url, DEFAULT_CHECKER_URL);
        assert_eq!(config.language, "en-US");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_builder() {
        let config = CheckerConfig::default()
            .base_url("http://localhost:8010")
            .language("de-DE")
            .timeout(Duration::from_secs(5));
        assert_eq!(config.base_url, "http://localhost:8010");
        assert_eq!(config.language, "de-DE");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}
