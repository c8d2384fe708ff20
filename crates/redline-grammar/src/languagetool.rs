//! LanguageTool-compatible grammar checker backend.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, instrument, warn};

use redline_core::{CheckedMatch, Error, GrammarChecker, Result};

use crate::config::CheckerConfig;

/// The checker returns up to dozens of suggestions per match; only the
/// first few are ever useful, and only the first is applied.
pub const MAX_REPLACEMENTS: usize = 5;

/// HTTP backend for a LanguageTool-compatible `/v2/check` endpoint.
pub struct LanguageToolBackend {
    client: Client,
    base_url: String,
}

impl LanguageToolBackend {
    /// Create a backend from the given configuration.
    pub fn with_config(config: &CheckerConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.base_url.clone(),
        }
    }

    /// Create from environment variables (see [`CheckerConfig::from_env`]).
    pub fn from_env() -> Self {
        Self::with_config(&CheckerConfig::from_env())
    }
}

#[async_trait]
impl GrammarChecker for LanguageToolBackend {
    #[instrument(skip(self, text), fields(subsystem = "grammar", component = "languagetool", op = "check", text_len = text.len()))]
    async fn check(&self, text: &str, language: &str) -> Result<Vec<CheckedMatch>> {
        let start = Instant::now();

        let response = self
            .client
            .post(format!("{}/v2/check", self.base_url))
            .form(&[("text", text), ("language", language)])
            .send()
            .await
            .map_err(|e| Error::GrammarCheck(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::GrammarCheck(format!(
                "LanguageTool returned {}: {}",
                status, body
            )));
        }

        let result: CheckResponse = response
            .json()
            .await
            .map_err(|e| Error::GrammarCheck(format!("Failed to parse response: {}", e)))?;

        let matches: Vec<CheckedMatch> = result.matches.into_iter().map(LtMatch::into_match).collect();

        let elapsed = start.elapsed().as_millis() as u64;
        debug!(
            issue_count = matches.len(),
            duration_ms = elapsed,
            "Grammar check complete"
        );
        if elapsed > 10_000 {
            warn!(
                duration_ms = elapsed,
                text_len = text.len(),
                slow = true,
                "Slow grammar check"
            );
        }
        Ok(matches)
    }

    async fn health_check(&self) -> Result<bool> {
        match self
            .client
            .get(format!("{}/v2/languages", self.base_url))
            .send()
            .await
        {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(e) => {
                warn!(error = %e, "LanguageTool health check failed");
                Ok(false)
            }
        }
    }
}

/// Response body of `/v2/check`.
#[derive(Deserialize)]
struct CheckResponse {
    #[serde(default)]
    matches: Vec<LtMatch>,
}

#[derive(Deserialize)]
struct LtMatch {
    #[serde(default)]
    message: String,
    #[serde(rename = "shortMessage")]
    short_message: Option<String>,
    #[serde(default)]
    offset: i32,
    #[serde(default)]
    length: i32,
    context: Option<LtContext>,
    #[serde(default)]
    replacements: Vec<LtReplacement>,
    rule: Option<LtRule>,
}

#[derive(Deserialize)]
struct LtContext {
    text: Option<String>,
}

#[derive(Deserialize)]
struct LtReplacement {
    value: String,
}

#[derive(Deserialize)]
struct LtRule {
    id: Option<String>,
    #[serde(rename = "issueType")]
    issue_type: Option<String>,
    category: Option<LtCategory>,
}

#[derive(Deserialize)]
struct LtCategory {
    name: Option<String>,
}

impl LtMatch {
    fn into_match(self) -> CheckedMatch {
        let replacements = self
            .replacements
            .into_iter()
            .take(MAX_REPLACEMENTS)
            .map(|r| r.value)
            .collect();

        let (rule_id, issue_type, category) = match self.rule {
            Some(rule) => (
                rule.id,
                rule.issue_type,
                rule.category.and_then(|c| c.name),
            ),
            None => (None, None, None),
        };

        CheckedMatch {
            message: self.message,
            short_message: self.short_message,
            offset: self.offset,
            length: self.length,
            context: self.context.and_then(|c| c.text),
            replacements,
            issue_type,
            rule_id,
            category,
        }
    }
}
