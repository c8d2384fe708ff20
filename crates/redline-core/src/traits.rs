//! Core traits for redline abstractions.
//!
//! The grammar checker is an external collaborator consumed as a black box;
//! this trait is the seam that lets tests substitute a fake checker for the
//! real HTTP backend.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::CheckedMatch;

/// An external grammar/style checker.
///
/// Implementations submit the combined text of one revision and return the
/// checker's complete current opinion as a list of offset-addressed matches.
/// One synchronous call per request; no retries.
#[async_trait]
pub trait GrammarChecker: Send + Sync {
    /// Check `text` in the given language code (e.g. "en-US").
    ///
    /// Any non-success response surfaces as [`crate::Error::GrammarCheck`].
    async fn check(&self, text: &str, language: &str) -> Result<Vec<CheckedMatch>>;

    /// Whether the checker endpoint is reachable.
    async fn health_check(&self) -> Result<bool>;
}
