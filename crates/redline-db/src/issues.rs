//! Issue store: grammar issues discovered for a revision snapshot.

use sqlx::{Pool, Postgres, Row, Transaction};
use tracing::debug;
use uuid::Uuid;

use redline_core::{new_v7, CheckedMatch, Error, GrammarIssue, Result, Revision};

/// PostgreSQL issue store.
///
/// Each grammar check represents the checker's complete current opinion
/// about a revision's text, so the issue set for a revision is always
/// replaced wholesale, never merged.
pub struct PgIssueRepository {
    pool: Pool<Postgres>,
}

impl PgIssueRepository {
    /// Create a new PgIssueRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Replace every stored issue for the revision with a freshly computed
    /// set, atomically. Offsets are validated against the revision's
    /// recombined text before anything is deleted; a single bad match
    /// rejects the whole batch and leaves prior issues untouched.
    pub async fn replace(
        &self,
        revision: &Revision,
        matches: &[CheckedMatch],
    ) -> Result<Vec<GrammarIssue>> {
        let text_len = revision.combined_text().len();
        for m in matches {
            if m.offset < 0 || m.length < 0 {
                return Err(Error::InvalidInput(format!(
                    "negative offset/length in match at offset {}",
                    m.offset
                )));
            }
            if (m.offset as usize) + (m.length as usize) > text_len {
                return Err(Error::InvalidInput(format!(
                    "match at offset {} length {} exceeds text of {} bytes",
                    m.offset, m.length, text_len
                )));
            }
        }

        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        sqlx::query("DELETE FROM grammar_issues WHERE revision_id = $1")
            .bind(revision.id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        let mut issues = Vec::with_capacity(matches.len());
        for m in matches {
            let id = new_v7();
            let row = sqlx::query(
                r#"
                INSERT INTO grammar_issues
                    (id, revision_id, message, short_message, "offset", length,
                     context, replacements, issue_type, rule_id, category,
                     is_applied, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, FALSE, now())
                RETURNING created_at
                "#,
            )
            .bind(id)
            .bind(revision.id)
            .bind(&m.message)
            .bind(&m.short_message)
            .bind(m.offset)
            .bind(m.length)
            .bind(&m.context)
            .bind(serde_json::to_value(&m.replacements)?)
            .bind(&m.issue_type)
            .bind(&m.rule_id)
            .bind(&m.category)
            .fetch_one(&mut *tx)
            .await
            .map_err(Error::Database)?;

            issues.push(GrammarIssue {
                id,
                revision_id: revision.id,
                message: m.message.clone(),
                short_message: m.short_message.clone(),
                offset: m.offset,
                length: m.length,
                context: m.context.clone(),
                replacements: m.replacements.clone(),
                issue_type: m.issue_type.clone(),
                rule_id: m.rule_id.clone(),
                category: m.category.clone(),
                is_applied: false,
                created_at: row.get("created_at"),
            });
        }

        tx.commit().await.map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "issues",
            op = "replace",
            revision_id = %revision.id,
            issue_count = issues.len(),
            "Replaced issue set for revision"
        );
        Ok(issues)
    }

    /// List all issues for a revision in ascending offset order (natural
    /// reading order).
    pub async fn list(&self, revision_id: Uuid) -> Result<Vec<GrammarIssue>> {
        let rows = sqlx::query(
            r#"
            SELECT id, revision_id, message, short_message, "offset", length,
                   context, replacements, issue_type, rule_id, category,
                   is_applied, created_at
            FROM grammar_issues
            WHERE revision_id = $1
            ORDER BY "offset" ASC, id ASC
            "#,
        )
        .bind(revision_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        rows.into_iter().map(map_issue_row).collect()
    }

    /// Fetch the subset of the given issue ids that actually belong to the
    /// revision. Foreign or stale ids are dropped, not errors; the apply
    /// path reports them through a lower applied count.
    pub async fn get_for_revision_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        revision_id: Uuid,
        issue_ids: &[Uuid],
    ) -> Result<Vec<GrammarIssue>> {
        let rows = sqlx::query(
            r#"
            SELECT id, revision_id, message, short_message, "offset", length,
                   context, replacements, issue_type, rule_id, category,
                   is_applied, created_at
            FROM grammar_issues
            WHERE revision_id = $1 AND id = ANY($2)
            ORDER BY "offset" DESC
            "#,
        )
        .bind(revision_id)
        .bind(issue_ids)
        .fetch_all(&mut **tx)
        .await
        .map_err(Error::Database)?;

        rows.into_iter().map(map_issue_row).collect()
    }

    /// Set the applied flag for the given issues. Idempotent: re-marking an
    /// already-applied issue is a no-op, and the flag never reverts.
    pub async fn mark_applied(&self, issue_ids: &[Uuid]) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        self.mark_applied_tx(&mut tx, issue_ids).await?;
        tx.commit().await.map_err(Error::Database)?;
        Ok(())
    }

    /// Transaction-aware variant of [`mark_applied`](PgIssueRepository::mark_applied).
    pub async fn mark_applied_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        issue_ids: &[Uuid],
    ) -> Result<()> {
        if issue_ids.is_empty() {
            return Ok(());
        }

        sqlx::query(
            "UPDATE grammar_issues SET is_applied = TRUE WHERE id = ANY($1) AND is_applied = FALSE",
        )
        .bind(issue_ids)
        .execute(&mut **tx)
        .await
        .map_err(Error::Database)?;

        Ok(())
    }
}

/// Map a grammar_issues row, deserializing the replacements list.
fn map_issue_row(row: sqlx::postgres::PgRow) -> Result<GrammarIssue> {
    let replacements: serde_json::Value = row.get("replacements");
    let replacements: Vec<String> = serde_json::from_value(replacements)?;

    Ok(GrammarIssue {
        id: row.get("id"),
        revision_id: row.get("revision_id"),
        message: row.get("message"),
        short_message: row.get("short_message"),
        offset: row.get("offset"),
        length: row.get("length"),
        context: row.get("context"),
        replacements,
        issue_type: row.get("issue_type"),
        rule_id: row.get("rule_id"),
        category: row.get("category"),
        is_applied: row.get("is_applied"),
        created_at: row.get("created_at"),
    })
}
