//! Structured logging schema and field name constants for redline.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation tools can query by standardized field names across
//! every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events, operation completions |
//! | DEBUG | Decision points, intermediate values |
//! | TRACE | Per-item iteration, high-volume data |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "db", "grammar"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "notes", "revisions", "issues", "languagetool", "pool"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "update", "restore", "check", "apply_fixes"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Note UUID being operated on.
pub const NOTE_ID: &str = "note_id";

/// Revision UUID being operated on.
pub const REVISION_ID: &str = "revision_id";

/// Owner UUID making the request.
pub const OWNER_ID: &str = "owner_id";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of issues returned by a check or list.
pub const ISSUE_COUNT: &str = "issue_count";

/// Number of fixes actually applied in a batch.
pub const APPLIED_COUNT: &str = "applied_count";

/// Byte length of the combined text submitted to the checker.
pub const TEXT_LEN: &str = "text_len";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// Slow operation threshold exceeded.
pub const SLOW: &str = "slow";
