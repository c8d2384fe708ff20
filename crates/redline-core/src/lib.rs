//! # redline-core
//!
//! Core types, traits, and abstractions for the redline note service.
//!
//! This crate provides the foundational data structures, the error taxonomy,
//! and the offset-splicing correction engine that the other redline crates
//! depend on.

pub mod correction;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;
pub mod uuid_utils;

// Re-export commonly used types at crate root
pub use correction::{apply_spans, combined_text, FixSpan, SpliceOutcome};
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
pub use uuid_utils::{extract_timestamp, is_v7, new_v7};
