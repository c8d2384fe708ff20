//! Revision store: append-only history of a note's prior states.

use sqlx::{Pool, Postgres, Transaction};
use tracing::debug;
use uuid::Uuid;

use redline_core::{new_v7, Error, Note, Result, Revision};

/// PostgreSQL revision store.
///
/// Revisions are created in exactly one place: [`snapshot_tx`], which the
/// note lifecycle path calls inside its own transaction immediately before
/// mutating the live note. Everything else here is read-only.
///
/// [`snapshot_tx`]: PgRevisionRepository::snapshot_tx
pub struct PgRevisionRepository {
    pool: Pool<Postgres>,
}

impl PgRevisionRepository {
    /// Create a new PgRevisionRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Persist a snapshot of the note's current (pre-edit) title and content.
    ///
    /// Runs inside the caller's transaction so the snapshot commits together
    /// with the live-note mutation it precedes; a rollback leaves no orphan
    /// revision. A null content body snapshots as the empty string.
    pub async fn snapshot_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        note: &Note,
    ) -> Result<Uuid> {
        let id = new_v7();
        sqlx::query(
            r#"
            INSERT INTO note_revisions (id, note_id, title, content, created_at)
            VALUES ($1, $2, $3, $4, now())
            "#,
        )
        .bind(id)
        .bind(note.id)
        .bind(&note.title)
        .bind(note.content.as_deref().unwrap_or(""))
        .execute(&mut **tx)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "revisions",
            op = "snapshot",
            note_id = %note.id,
            revision_id = %id,
            "Snapshotted note state"
        );
        Ok(id)
    }

    /// List all revisions of a note in stable chronological order (oldest
    /// first), restricted to the requesting owner.
    pub async fn list(&self, note_id: Uuid, owner_id: Uuid) -> Result<Vec<Revision>> {
        let revisions: Vec<Revision> = sqlx::query_as(
            r#"
            SELECT r.id, r.note_id, r.title, r.content, r.created_at
            FROM note_revisions r
            JOIN notes n ON n.id = r.note_id
            WHERE r.note_id = $1 AND n.owner_id = $2
            ORDER BY r.created_at ASC, r.id ASC
            "#,
        )
        .bind(note_id)
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(revisions)
    }

    /// Fetch one revision by id, restricted to the requesting owner.
    ///
    /// "Absent" and "exists but not yours" are both NotFound.
    pub async fn get(&self, revision_id: Uuid, owner_id: Uuid) -> Result<Revision> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        let revision = self.get_tx(&mut tx, revision_id, owner_id).await?;
        tx.commit().await.map_err(Error::Database)?;
        Ok(revision)
    }

    /// Transaction-aware variant of [`get`](PgRevisionRepository::get).
    pub async fn get_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        revision_id: Uuid,
        owner_id: Uuid,
    ) -> Result<Revision> {
        let revision: Option<Revision> = sqlx::query_as(
            r#"
            SELECT r.id, r.note_id, r.title, r.content, r.created_at
            FROM note_revisions r
            JOIN notes n ON n.id = r.note_id
            WHERE r.id = $1 AND n.owner_id = $2
            "#,
        )
        .bind(revision_id)
        .bind(owner_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(Error::Database)?;

        revision.ok_or_else(|| Error::NotFound(format!("revision {}", revision_id)))
    }
}
