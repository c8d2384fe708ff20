//! Tag repository implementation.
//!
//! Tags are deduplicated by unique name and linked to notes many-to-many.
//! They are not versioned: note snapshots preserve title/content only.

use sqlx::{Pool, Postgres, Transaction};
use uuid::Uuid;

use redline_core::{Error, Result, Tag};

/// Validate a tag name.
///
/// Rules:
/// - Length between 1-100 characters
/// - Allowed characters: alphanumeric, hyphens (-), underscores (_)
///
/// Returns Ok(()) if valid, Err with message if invalid.
pub fn validate_tag_name(tag: &str) -> std::result::Result<(), String> {
    if tag.is_empty() {
        return Err("Tag name cannot be empty".to_string());
    }
    if tag.len() > 100 {
        return Err("Tag name must be 100 characters or less".to_string());
    }

    let invalid_chars: Vec<char> = tag
        .chars()
        .filter(|c| !c.is_alphanumeric() && *c != '-' && *c != '_')
        .collect();

    if !invalid_chars.is_empty() {
        let chars_display: String = invalid_chars
            .iter()
            .take(5)
            .map(|c| format!("'{}'", c))
            .collect::<Vec<_>>()
            .join(", ");
        return Err(format!(
            "Tag contains invalid characters: {}. Only alphanumeric characters, hyphens, and underscores are allowed",
            chars_display
        ));
    }

    Ok(())
}

/// PostgreSQL tag repository.
pub struct PgTagRepository {
    pool: Pool<Postgres>,
}

impl PgTagRepository {
    /// Create a new PgTagRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all tags.
    pub async fn list(&self) -> Result<Vec<Tag>> {
        let tags: Vec<Tag> = sqlx::query_as("SELECT id, name FROM tags ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(tags)
    }

    /// Find a tag by its unique name.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Tag>> {
        let tag: Option<Tag> = sqlx::query_as("SELECT id, name FROM tags WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(tag)
    }

    /// Get all tags for a note, ordered by name.
    pub async fn get_for_note(&self, note_id: Uuid) -> Result<Vec<Tag>> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        let tags = self.get_for_note_tx(&mut tx, note_id).await?;
        tx.commit().await.map_err(Error::Database)?;
        Ok(tags)
    }

    /// Transaction-aware variant of [`get_for_note`](PgTagRepository::get_for_note).
    pub async fn get_for_note_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        note_id: Uuid,
    ) -> Result<Vec<Tag>> {
        let tags: Vec<Tag> = sqlx::query_as(
            r#"
            SELECT t.id, t.name
            FROM tags t
            JOIN note_tags nt ON nt.tag_id = t.id
            WHERE nt.note_id = $1
            ORDER BY t.name
            "#,
        )
        .bind(note_id)
        .fetch_all(&mut **tx)
        .await
        .map_err(Error::Database)?;
        Ok(tags)
    }

    /// Replace a note's tag set, creating missing tags by name in the same
    /// transaction as the note edit (avoids duplicate-tag races).
    pub async fn set_for_note_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        note_id: Uuid,
        names: &[String],
    ) -> Result<Vec<Tag>> {
        for name in names {
            validate_tag_name(name).map_err(Error::InvalidInput)?;
        }

        sqlx::query("DELETE FROM note_tags WHERE note_id = $1")
            .bind(note_id)
            .execute(&mut **tx)
            .await
            .map_err(Error::Database)?;

        let mut tags = Vec::with_capacity(names.len());
        for name in names {
            // Lookup-or-create by name. The no-op DO UPDATE makes RETURNING
            // yield the row on conflict as well.
            let tag: Tag = sqlx::query_as(
                r#"
                INSERT INTO tags (name) VALUES ($1)
                ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
                RETURNING id, name
                "#,
            )
            .bind(name)
            .fetch_one(&mut **tx)
            .await
            .map_err(Error::Database)?;

            sqlx::query(
                "INSERT INTO note_tags (note_id, tag_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(note_id)
            .bind(tag.id)
            .execute(&mut **tx)
            .await
            .map_err(Error::Database)?;

            tags.push(tag);
        }

        Ok(tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_tag_name_accepts_simple_names() {
        assert!(validate_tag_name("groceries").is_ok());
        assert!(validate_tag_name("to-do_2026").is_ok());
    }

    #[test]
    fn test_validate_tag_name_rejects_empty() {
        assert!(validate_tag_name("").is_err());
    }

    #[test]
    fn test_validate_tag_name_rejects_too_long() {
        let long = "a".repeat(101);
        assert!(validate_tag_name(&long).is_err());
    }

    #[test]
    fn test_validate_tag_name_rejects_special_characters() {
        let err = validate_tag_name("has space").unwrap_err();
        assert!(err.contains("invalid characters"));
        assert!(validate_tag_name("semi;colon").is_err());
    }
}
