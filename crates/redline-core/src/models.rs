//! Core data models for redline.
//!
//! These types are shared across all redline crates and represent the
//! note / revision / grammar-issue domain entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::correction::combined_text;

// =============================================================================
// NOTE TYPES
// =============================================================================

/// A live, mutable note owned by a single user.
///
/// A soft-deleted note (`is_deleted = true`) is excluded from all normal
/// reads, but its revisions and grammar issues stay addressable for audit
/// and restore.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Note {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub content: Option<String>,
    pub is_deleted: bool,
}

/// A note together with its resolved tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteFull {
    pub note: Note,
    pub tags: Vec<Tag>,
}

/// Request for creating a new note.
#[derive(Debug, Clone, Default)]
pub struct CreateNoteRequest {
    pub title: String,
    pub content: Option<String>,
    pub tags: Vec<String>,
}

/// Partial-update request. Absent fields leave the current value unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

// =============================================================================
// REVISION TYPES
// =============================================================================

/// An immutable snapshot of a note's pre-edit (title, content) state.
///
/// Created exactly once, immediately before any mutation of the live note's
/// title or content (restores included); never updated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Revision {
    pub id: Uuid,
    pub note_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Revision {
    /// Recombine title and content into the single buffer the grammar
    /// checker analyzed. All issue offsets are relative to this buffer, so
    /// the join must stay byte-for-byte identical everywhere it is built.
    pub fn combined_text(&self) -> String {
        combined_text(&self.title, &self.content)
    }
}

// =============================================================================
// GRAMMAR ISSUE TYPES
// =============================================================================

/// A stored grammar issue, anchored by byte offset/length to one revision's
/// recombined text. Never re-anchored to a different revision or to the
/// live note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarIssue {
    pub id: Uuid,
    pub revision_id: Uuid,
    pub message: String,
    pub short_message: Option<String>,
    pub offset: i32,
    pub length: i32,
    pub context: Option<String>,
    /// Ordered suggestion list; the first entry is the one applied.
    pub replacements: Vec<String>,
    pub issue_type: Option<String>,
    pub rule_id: Option<String>,
    pub category: Option<String>,
    pub is_applied: bool,
    pub created_at: DateTime<Utc>,
}

/// One match as reported by the external grammar checker, before it has
/// been persisted. Offsets address the combined text that was submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckedMatch {
    pub message: String,
    pub short_message: Option<String>,
    pub offset: i32,
    pub length: i32,
    pub context: Option<String>,
    pub replacements: Vec<String>,
    pub issue_type: Option<String>,
    pub rule_id: Option<String>,
    pub category: Option<String>,
}

/// Result of one apply-fixes batch.
///
/// `applied_count` can be lower than `requested_count`: issue ids that do
/// not belong to the revision are filtered out, and issues without any
/// suggested replacement are skipped (listed in `skipped`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyFixesOutcome {
    pub revision_id: Uuid,
    pub corrected_text: String,
    pub applied_count: usize,
    pub requested_count: usize,
    pub skipped: Vec<Uuid>,
}

// =============================================================================
// TAG TYPES
// =============================================================================

/// A deduplicated label, associated with notes many-to-many.
///
/// Tags are not versioned: snapshots preserve title/content only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    pub id: i32,
    pub name: String,
}
