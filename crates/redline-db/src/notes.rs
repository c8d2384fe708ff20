//! Note repository and edit lifecycle.
//!
//! Every content-changing edit follows the same sequence inside one
//! transaction: snapshot the pre-edit state into the revision store, then
//! mutate the live note. A rollback therefore never leaves an orphan
//! revision with no corresponding change. Restoring a revision is itself an
//! edit and goes through the same sequence, which keeps restores undoable.

use sqlx::{Pool, Postgres, Transaction};
use tracing::{debug, info};
use uuid::Uuid;

use redline_core::{
    new_v7, CreateNoteRequest, Error, Note, NoteFull, Result, Revision, UpdateNoteRequest,
};

use crate::revisions::PgRevisionRepository;
use crate::tags::PgTagRepository;

/// PostgreSQL note repository with snapshot-before-mutate edit semantics.
pub struct PgNoteRepository {
    pool: Pool<Postgres>,
    revisions: PgRevisionRepository,
    tags: PgTagRepository,
}

impl PgNoteRepository {
    /// Create a new PgNoteRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            revisions: PgRevisionRepository::new(pool.clone()),
            tags: PgTagRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a note, resolving tag names (creating missing tags) in the
    /// same transaction. Creation does not snapshot: there is no pre-edit
    /// state yet.
    pub async fn create(&self, owner_id: Uuid, req: CreateNoteRequest) -> Result<NoteFull> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let id = new_v7();
        sqlx::query(
            r#"
            INSERT INTO notes (id, owner_id, title, content, is_deleted)
            VALUES ($1, $2, $3, $4, FALSE)
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(&req.title)
        .bind(&req.content)
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?;

        let tags = self.tags.set_for_note_tx(&mut tx, id, &req.tags).await?;
        let note = self.fetch_note_tx(&mut tx, id, owner_id).await?;

        tx.commit().await.map_err(Error::Database)?;

        info!(
            subsystem = "db",
            component = "notes",
            op = "create",
            note_id = %id,
            owner_id = %owner_id,
            "Created note"
        );
        Ok(NoteFull { note, tags })
    }

    /// Fetch a live (non-deleted) note with its tags, owner-scoped.
    pub async fn fetch(&self, note_id: Uuid, owner_id: Uuid) -> Result<NoteFull> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        let note = self.fetch_note_tx(&mut tx, note_id, owner_id).await?;
        let tags = self.tags.get_for_note_tx(&mut tx, note_id).await?;
        tx.commit().await.map_err(Error::Database)?;
        Ok(NoteFull { note, tags })
    }

    /// List all live notes belonging to the owner, with tags.
    pub async fn list(&self, owner_id: Uuid) -> Result<Vec<NoteFull>> {
        let notes: Vec<Note> = sqlx::query_as(
            r#"
            SELECT id, owner_id, title, content, is_deleted
            FROM notes
            WHERE owner_id = $1 AND is_deleted = FALSE
            ORDER BY id
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        self.attach_tags(notes).await
    }

    /// List the owner's live notes carrying the given tag.
    ///
    /// An unknown tag name is NotFound, matching the per-entity contract.
    pub async fn list_by_tag(&self, owner_id: Uuid, tag_name: &str) -> Result<Vec<NoteFull>> {
        let tag = self
            .tags
            .find_by_name(tag_name)
            .await?
            .ok_or_else(|| Error::NotFound(format!("tag {}", tag_name)))?;

        let notes: Vec<Note> = sqlx::query_as(
            r#"
            SELECT n.id, n.owner_id, n.title, n.content, n.is_deleted
            FROM notes n
            JOIN note_tags nt ON nt.note_id = n.id
            WHERE n.owner_id = $1 AND n.is_deleted = FALSE AND nt.tag_id = $2
            ORDER BY n.id
            "#,
        )
        .bind(owner_id)
        .bind(tag.id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        self.attach_tags(notes).await
    }

    /// Apply a partial update to a live note.
    ///
    /// The pre-edit (title, content) is snapshotted first; absent fields
    /// keep their current value; tag names, when given, replace the note's
    /// tag set with lookup-or-create resolution. All of it commits in one
    /// transaction.
    pub async fn update(
        &self,
        note_id: Uuid,
        owner_id: Uuid,
        req: UpdateNoteRequest,
    ) -> Result<NoteFull> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let note = self.fetch_note_tx(&mut tx, note_id, owner_id).await?;
        let revision_id = self.revisions.snapshot_tx(&mut tx, &note).await?;

        sqlx::query(
            r#"
            UPDATE notes
            SET title = COALESCE($1, title),
                content = COALESCE($2, content)
            WHERE id = $3
            "#,
        )
        .bind(&req.title)
        .bind(&req.content)
        .bind(note_id)
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?;

        let tags = match &req.tags {
            Some(names) => self.tags.set_for_note_tx(&mut tx, note_id, names).await?,
            None => self.tags.get_for_note_tx(&mut tx, note_id).await?,
        };
        let note = self.fetch_note_tx(&mut tx, note_id, owner_id).await?;

        tx.commit().await.map_err(Error::Database)?;

        info!(
            subsystem = "db",
            component = "notes",
            op = "update",
            note_id = %note_id,
            revision_id = %revision_id,
            "Updated note with pre-edit snapshot"
        );
        Ok(NoteFull { note, tags })
    }

    /// Copy a historical revision's title/content back onto the live note.
    ///
    /// The note's current state is snapshotted first, so the restore is
    /// itself a reversible edit. Note and revision are resolved together
    /// under the owner; any mismatch is NotFound.
    pub async fn restore(
        &self,
        note_id: Uuid,
        revision_id: Uuid,
        owner_id: Uuid,
    ) -> Result<NoteFull> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let note = self.fetch_note_tx(&mut tx, note_id, owner_id).await?;
        let revision: Revision = self.revisions.get_tx(&mut tx, revision_id, owner_id).await?;
        if revision.note_id != note_id {
            return Err(Error::NotFound(format!("revision {}", revision_id)));
        }

        let snapshot_id = self.revisions.snapshot_tx(&mut tx, &note).await?;

        sqlx::query("UPDATE notes SET title = $1, content = $2 WHERE id = $3")
            .bind(&revision.title)
            .bind(&revision.content)
            .bind(note_id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        let tags = self.tags.get_for_note_tx(&mut tx, note_id).await?;
        let note = self.fetch_note_tx(&mut tx, note_id, owner_id).await?;

        tx.commit().await.map_err(Error::Database)?;

        info!(
            subsystem = "db",
            component = "notes",
            op = "restore",
            note_id = %note_id,
            revision_id = %revision_id,
            snapshot_id = %snapshot_id,
            "Restored note from revision"
        );
        Ok(NoteFull { note, tags })
    }

    /// Soft-delete a note. Not a content edit: no snapshot is taken, and
    /// revisions/issues stay addressable for audit and restore. Idempotent.
    pub async fn soft_delete(&self, note_id: Uuid, owner_id: Uuid) -> Result<()> {
        let result = sqlx::query("UPDATE notes SET is_deleted = TRUE WHERE id = $1 AND owner_id = $2")
            .bind(note_id)
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("note {}", note_id)));
        }

        debug!(
            subsystem = "db",
            component = "notes",
            op = "soft_delete",
            note_id = %note_id,
            "Soft-deleted note"
        );
        Ok(())
    }

    /// Fetch a live, owned note row inside the caller's transaction.
    async fn fetch_note_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        note_id: Uuid,
        owner_id: Uuid,
    ) -> Result<Note> {
        let note: Option<Note> = sqlx::query_as(
            r#"
            SELECT id, owner_id, title, content, is_deleted
            FROM notes
            WHERE id = $1 AND owner_id = $2 AND is_deleted = FALSE
            "#,
        )
        .bind(note_id)
        .bind(owner_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(Error::Database)?;

        note.ok_or_else(|| Error::NotFound(format!("note {}", note_id)))
    }

    /// Resolve tags for a batch of notes with one query.
    async fn attach_tags(&self, notes: Vec<Note>) -> Result<Vec<NoteFull>> {
        if notes.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = notes.iter().map(|n| n.id).collect();
        let rows: Vec<(Uuid, i32, String)> = sqlx::query_as(
            r#"
            SELECT nt.note_id, t.id, t.name
            FROM note_tags nt
            JOIN tags t ON t.id = nt.tag_id
            WHERE nt.note_id = ANY($1)
            ORDER BY t.name
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let mut by_note: std::collections::HashMap<Uuid, Vec<redline_core::Tag>> =
            std::collections::HashMap::new();
        for (note_id, tag_id, name) in rows {
            by_note
                .entry(note_id)
                .or_default()
                .push(redline_core::Tag { id: tag_id, name });
        }

        Ok(notes
            .into_iter()
            .map(|note| {
                let tags = by_note.remove(&note.id).unwrap_or_default();
                NoteFull { note, tags }
            })
            .collect())
    }
}
