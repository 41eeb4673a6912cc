//! Durability capability consumed by the lifecycle.
//!
//! The lifecycle loads everything once at start and then writes whole
//! records after each mutation. Media bytes are never part of the stored
//! state.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::content::{Content, ContentId, ModerationAction};

/// Errors reported by a store implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend could not complete the operation.
    #[error("store backend error: {0}")]
    Backend(String),

    /// Stored data could not be decoded.
    #[error("corrupt stored data: {0}")]
    Corrupt(String),
}

/// Everything persisted by a store.
#[derive(Debug, Clone, Default)]
pub struct StoredState {
    /// All content records.
    pub contents: Vec<Content>,
    /// Moderation log entries, oldest first.
    pub actions: Vec<ModerationAction>,
}

/// Durable keyed collection of content records plus the moderation log.
pub trait ContentStore: Send + Sync {
    /// Loads all persisted state.
    fn load(&self) -> Result<StoredState, StoreError>;

    /// Writes a whole content record, replacing any previous version.
    fn save_content(&self, content: &Content) -> Result<(), StoreError>;

    /// Writes a moderated record and its log entry as one unit.
    fn save_moderation(
        &self,
        content: &Content,
        action: &ModerationAction,
    ) -> Result<(), StoreError>;
}

/// In-memory store, for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<StoredState>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with state.
    pub fn with_state(state: StoredState) -> Self {
        Self {
            inner: Mutex::new(state),
        }
    }

    /// Returns a copy of the stored state.
    pub fn snapshot(&self) -> StoredState {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn upsert(state: &mut StoredState, content: &Content) {
        match state.contents.iter_mut().find(|c| c.id == content.id) {
            Some(existing) => *existing = content.clone(),
            None => state.contents.push(content.clone()),
        }
    }
}

impl ContentStore for MemoryStore {
    fn load(&self) -> Result<StoredState, StoreError> {
        Ok(self.snapshot())
    }

    fn save_content(&self, content: &Content) -> Result<(), StoreError> {
        let mut state = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Self::upsert(&mut state, content);
        Ok(())
    }

    fn save_moderation(
        &self,
        content: &Content,
        action: &ModerationAction,
    ) -> Result<(), StoreError> {
        let mut state = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Self::upsert(&mut state, content);
        state.actions.push(action.clone());
        Ok(())
    }
}

/// Indexes loaded contents by id, keeping the last record for a duplicate id.
pub(crate) fn index_contents(contents: Vec<Content>) -> HashMap<ContentId, Content> {
    contents.into_iter().map(|c| (c.id.clone(), c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentType, ModeratorDecision};
    use chrono::Utc;

    fn content(id: &str) -> Content {
        Content::new(ContentId::from(id), ContentType::Text, "hello", None, Utc::now())
    }

    #[test]
    fn save_content_upserts() {
        let store = MemoryStore::new();
        let mut c = content("a");
        store.save_content(&c).unwrap();
        c.payload = "changed".to_string();
        store.save_content(&c).unwrap();

        let state = store.load().unwrap();
        assert_eq!(state.contents.len(), 1);
        assert_eq!(state.contents[0].payload, "changed");
    }

    #[test]
    fn save_moderation_writes_both() {
        let store = MemoryStore::new();
        let mut c = content("a");
        let now = Utc::now();
        c.apply_decision(ModeratorDecision::Block, None, "mod", now);
        let action = ModerationAction {
            content_id: c.id.clone(),
            action: ModeratorDecision::Block,
            notes: None,
            moderator: "mod".into(),
            resulting_status: c.status,
            timestamp: now,
        };
        store.save_moderation(&c, &action).unwrap();

        let state = store.load().unwrap();
        assert_eq!(state.contents.len(), 1);
        assert_eq!(state.actions, vec![action]);
    }
}
