//! # redline-db
//!
//! PostgreSQL database layer for redline.
//!
//! This crate provides:
//! - Connection pool management
//! - The note repository with snapshot-before-mutate edit semantics
//! - The append-only revision store
//! - The grammar-issue store (atomic replace, applied-flag tracking)
//! - Tag lookup-or-create resolution
//!
//! ## Example
//!
//! ```rust,ignore
//! use redline_db::Database;
//! use redline_core::CreateNoteRequest;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/redline").await?;
//!
//!     let owner = uuid::Uuid::new_v4();
//!     let note = db.notes.create(owner, CreateNoteRequest {
//!         title: "Shopping".to_string(),
//!         content: Some("Teh milk".to_string()),
//!         tags: vec!["errands".to_string()],
//!     }).await?;
//!
//!     println!("Created note: {}", note.note.id);
//!     Ok(())
//! }
//! ```

pub mod issues;
pub mod notes;
pub mod pool;
pub mod revisions;
pub mod tags;

// Test fixtures for integration tests
// Note: Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

// Re-export core types
pub use redline_core::*;

// Re-export repository implementations
pub use issues::PgIssueRepository;
pub use notes::PgNoteRepository;
pub use pool::{create_pool, create_pool_with_config, PoolConfig};
pub use revisions::PgRevisionRepository;
pub use tags::{validate_tag_name, PgTagRepository};

/// Combined database context with all repositories.
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Note repository (edit lifecycle: snapshot-before-mutate, restore).
    pub notes: PgNoteRepository,
    /// Append-only revision store.
    pub revisions: PgRevisionRepository,
    /// Grammar-issue store.
    pub issues: PgIssueRepository,
    /// Tag repository.
    pub tags: PgTagRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            notes: PgNoteRepository::new(pool.clone()),
            revisions: PgRevisionRepository::new(pool.clone()),
            issues: PgIssueRepository::new(pool.clone()),
            tags: PgTagRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}
