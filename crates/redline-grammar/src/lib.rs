//! # redline-grammar
//!
//! Grammar-checker collaborator and correction pipeline for redline.
//!
//! This crate provides:
//! - [`LanguageToolBackend`]: HTTP client for a LanguageTool-compatible
//!   `/v2/check` endpoint
//! - [`GrammarService`]: check a revision, list its issues, and apply a
//!   selected batch of fixes to its combined text
//! - [`MockChecker`]: deterministic in-process checker for tests

pub mod config;
pub mod languagetool;
pub mod mock;
pub mod service;

pub use config::{CheckerConfig, DEFAULT_CHECKER_URL, DEFAULT_LANGUAGE};
pub use languagetool::{LanguageToolBackend, MAX_REPLACEMENTS};
pub use mock::MockChecker;
pub use service::GrammarService;
