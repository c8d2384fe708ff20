//! Mock grammar checker for deterministic testing.
//!
//! Returns canned matches without touching the network, records every call,
//! and can be told to fail, so coordinator-level tests can exercise the
//! check/apply pipeline without a LanguageTool instance.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use redline_core::{CheckedMatch, Error, GrammarChecker, Result};

/// One recorded call to the mock.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub text: String,
    pub language: String,
}

/// Mock checker with canned matches and failure injection.
#[derive(Clone, Default)]
pub struct MockChecker {
    matches: Arc<Mutex<Vec<CheckedMatch>>>,
    fail_with: Arc<Mutex<Option<String>>>,
    calls: Arc<Mutex<Vec<MockCall>>>,
}

impl MockChecker {
    /// Create a mock that reports no issues.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the matches every check call returns.
    pub fn with_matches(self, matches: Vec<CheckedMatch>) -> Self {
        *self.matches.lock().unwrap() = matches;
        self
    }

    /// Make every check call fail with the given message.
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        *self.fail_with.lock().unwrap() = Some(message.into());
        self
    }

    /// The calls recorded so far.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GrammarChecker for MockChecker {
    async fn check(&self, text: &str, language: &str) -> Result<Vec<CheckedMatch>> {
        self.calls.lock().unwrap().push(MockCall {
            text: text.to_string(),
            language: language.to_string(),
        });

        if let Some(message) = self.fail_with.lock().unwrap().clone() {
            return Err(Error::GrammarCheck(message));
        }

        Ok(self.matches.lock().unwrap().clone())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.fail_with.lock().unwrap().is_none())
    }
}
