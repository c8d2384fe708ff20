//! Grammar service: checking revisions and applying fixes.
//!
//! Ties the checker backend, the revision store, and the issue store
//! together. Note that `apply_fixes` only computes corrected text and flips
//! applied flags; writing the text back onto the note (which snapshots and
//! creates a new revision) is the note repository's update path, kept
//! separate so the two can be tested independently.

use std::time::Instant;

use tracing::{debug, info};
use uuid::Uuid;

use redline_core::{
    apply_spans, ApplyFixesOutcome, Error, FixSpan, GrammarChecker, GrammarIssue, Result,
};
use redline_db::Database;

/// Orchestrates grammar checks and correction batches for one checker.
pub struct GrammarService<C: GrammarChecker> {
    db: Database,
    checker: C,
    language: String,
}

impl<C: GrammarChecker> GrammarService<C> {
    /// Create a service over the given database and checker backend.
    pub fn new(db: Database, checker: C, language: impl Into<String>) -> Self {
        Self {
            db,
            checker,
            language: language.into(),
        }
    }

    /// Run a grammar check against one revision and replace its stored
    /// issue set with the result.
    ///
    /// The checker call happens before any deletion, so an upstream failure
    /// leaves the previous issues untouched.
    pub async fn check_revision(
        &self,
        note_id: Uuid,
        revision_id: Uuid,
        owner_id: Uuid,
    ) -> Result<Vec<GrammarIssue>> {
        let start = Instant::now();
        let revision = self.db.revisions.get(revision_id, owner_id).await?;
        if revision.note_id != note_id {
            return Err(Error::NotFound(format!("revision {}", revision_id)));
        }

        let text = revision.combined_text();
        let matches = self.checker.check(&text, &self.language).await?;
        let issues = self.db.issues.replace(&revision, &matches).await?;

        info!(
            subsystem = "grammar",
            component = "service",
            op = "check",
            note_id = %note_id,
            revision_id = %revision_id,
            issue_count = issues.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Grammar check stored"
        );
        Ok(issues)
    }

    /// List the stored issues for a revision, ascending by offset.
    pub async fn list_issues(
        &self,
        note_id: Uuid,
        revision_id: Uuid,
        owner_id: Uuid,
    ) -> Result<Vec<GrammarIssue>> {
        let revision = self.db.revisions.get(revision_id, owner_id).await?;
        if revision.note_id != note_id {
            return Err(Error::NotFound(format!("revision {}", revision_id)));
        }
        self.db.issues.list(revision_id).await
    }

    /// Apply a selected batch of issues to a revision's combined text.
    ///
    /// Issue ids that do not belong to the revision are silently filtered;
    /// issues without a suggested replacement are skipped. The splice and
    /// the applied-flag updates happen in one transaction, so the returned
    /// text and the flags always come from a single consistent pass. The
    /// live note is never written here.
    pub async fn apply_fixes(
        &self,
        note_id: Uuid,
        revision_id: Uuid,
        owner_id: Uuid,
        issue_ids: &[Uuid],
    ) -> Result<ApplyFixesOutcome> {
        let mut tx = self.db.pool.begin().await.map_err(Error::Database)?;

        let revision = self
            .db
            .revisions
            .get_tx(&mut tx, revision_id, owner_id)
            .await?;
        if revision.note_id != note_id {
            return Err(Error::NotFound(format!("revision {}", revision_id)));
        }

        let issues = self
            .db
            .issues
            .get_for_revision_tx(&mut tx, revision_id, issue_ids)
            .await?;

        let spans = issues
            .iter()
            .map(issue_to_span)
            .collect::<Result<Vec<_>>>()?;

        let text = revision.combined_text();
        let outcome = apply_spans(&text, &spans)?;

        self.db
            .issues
            .mark_applied_tx(&mut tx, &outcome.applied)
            .await?;
        tx.commit().await.map_err(Error::Database)?;

        debug!(
            subsystem = "grammar",
            component = "service",
            op = "apply_fixes",
            revision_id = %revision_id,
            applied_count = outcome.applied.len(),
            requested = issue_ids.len(),
            "Applied correction batch"
        );

        Ok(ApplyFixesOutcome {
            revision_id,
            corrected_text: outcome.text,
            applied_count: outcome.applied.len(),
            requested_count: issue_ids.len(),
            skipped: outcome.skipped,
        })
    }
}

/// Convert a stored issue into a splice span, taking the first suggestion.
fn issue_to_span(issue: &GrammarIssue) -> Result<FixSpan> {
    let offset = usize::try_from(issue.offset)
        .map_err(|_| Error::InvalidInput(format!("issue {} has a negative offset", issue.id)))?;
    let length = usize::try_from(issue.length)
        .map_err(|_| Error::InvalidInput(format!("issue {} has a negative length", issue.id)))?;

    Ok(FixSpan {
        id: issue.id,
        offset,
        length,
        replacement: issue.replacements.first().cloned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn issue(offset: i32, length: i32, replacements: Vec<&str>) -> GrammarIssue {
        GrammarIssue {
            id: Uuid::new_v4(),
            revision_id: Uuid::new_v4(),
            message: "msg".to_string(),
            short_message: None,
            offset,
            length,
            context: None,
            replacements: replacements.into_iter().map(String::from).collect(),
            issue_type: None,
            rule_id: None,
            category: None,
            is_applied: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_to_span_takes_first_replacement() {
        let span = issue_to_span(&issue(3, 2, vec!["first", "second"])).unwrap();
        assert_eq!(span.offset, 3);
        assert_eq!(span.length, 2);
        assert_eq!(span.replacement.as_deref(), Some("first"));
    }

    #[test]
    fn test_issue_to_span_no_replacements() {
        let span = issue_to_span(&issue(0, 1, vec![])).unwrap();
        assert!(span.replacement.is_none());
    }

    #[test]
    fn test_issue_to_span_negative_offset_rejected() {
        let err = issue_to_span(&issue(-1, 1, vec!["x"])).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_issue_to_span_negative_length_rejected() {
        let err = issue_to_span(&issue(0, -4, vec!["x"])).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
