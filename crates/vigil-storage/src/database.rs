//! High-level database interface.

use std::path::PathBuf;

use directories::ProjectDirs;
use tracing::{debug, info};
use vigil_core::{Content, ContentId, ContentStore, ModerationAction, StoreError, StoredState};

use crate::error::{Result, StorageError};
use crate::pool::ConnectionPool;
use crate::repository::{ActionsRepo, ContentsRepo};

/// High-level database interface for Vigil.
#[derive(Clone)]
pub struct Database {
    pool: ConnectionPool,
}

impl Database {
    /// Create a new database in the default app data directory.
    pub fn new() -> Result<Self> {
        Self::with_path(Self::default_db_path()?)
    }

    /// Create a new database at a specific path.
    pub fn with_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        info!("Opening database at: {:?}", path);
        let pool = ConnectionPool::new(&path)?;

        Ok(Self { pool })
    }

    /// Create an in-memory database (for testing).
    pub fn in_memory() -> Result<Self> {
        let pool = ConnectionPool::in_memory()?;
        Ok(Self { pool })
    }

    /// Get the default database path.
    pub fn default_db_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "vigil", "vigil")
            .ok_or_else(|| StorageError::Config("Could not determine app data directory".into()))?;

        Ok(proj_dirs.data_dir().join("vigil.db"))
    }

    // === Contents ===

    /// Insert or replace a content record.
    pub fn upsert_content(&self, content: &Content) -> Result<()> {
        let conn = self.pool.get()?;
        ContentsRepo::upsert(&conn, content)
    }

    /// Get a content record by ID.
    pub fn get_content(&self, id: &ContentId) -> Result<Option<Content>> {
        let conn = self.pool.get()?;
        ContentsRepo::get_by_id(&conn, id)
    }

    /// Get all content records, oldest first.
    pub fn get_all_contents(&self) -> Result<Vec<Content>> {
        let conn = self.pool.get()?;
        ContentsRepo::get_all(&conn)
    }

    // === Moderation log ===

    /// Writes the moderated record and its log entry in one transaction.
    pub fn record_moderation(&self, content: &Content, action: &ModerationAction) -> Result<()> {
        let conn = self.pool.get()?;
        let tx = conn.unchecked_transaction()?;

        ContentsRepo::upsert(&tx, content)?;
        let row = ActionsRepo::insert(&tx, action)?;

        tx.commit()?;
        debug!(id = %content.id, row, "Moderation committed");
        Ok(())
    }

    /// All log entries in append order.
    pub fn get_all_actions(&self) -> Result<Vec<ModerationAction>> {
        let conn = self.pool.get()?;
        ActionsRepo::get_all(&conn)
    }

    /// Log entries for one record in append order.
    pub fn get_actions_for(&self, id: &ContentId) -> Result<Vec<ModerationAction>> {
        let conn = self.pool.get()?;
        ActionsRepo::get_for_content(&conn, id)
    }
}

impl ContentStore for Database {
    fn load(&self) -> std::result::Result<StoredState, StoreError> {
        let conn = self.pool.get()?;
        let contents = ContentsRepo::get_all(&conn)?;
        let actions = ActionsRepo::get_all(&conn)?;

        debug!(
            contents = contents.len(),
            actions = actions.len(),
            "Loaded stored state"
        );
        Ok(StoredState { contents, actions })
    }

    fn save_content(&self, content: &Content) -> std::result::Result<(), StoreError> {
        Ok(self.upsert_content(content)?)
    }

    fn save_moderation(
        &self,
        content: &Content,
        action: &ModerationAction,
    ) -> std::result::Result<(), StoreError> {
        Ok(self.record_moderation(content, action)?)
    }
}
