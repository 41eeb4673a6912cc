//! Moderation log repository.

use rusqlite::{params, Connection, Row};
use vigil_core::{ContentId, ContentStatus, ModerationAction, ModeratorDecision};

use super::{format_datetime, parse_datetime};
use crate::error::{Result, StorageError};

/// Repository for moderation log entries. Entries are never updated.
pub struct ActionsRepo;

impl ActionsRepo {
    /// Append an entry.
    pub fn insert(conn: &Connection, action: &ModerationAction) -> Result<i64> {
        conn.execute(
            "INSERT INTO moderation_actions (content_id, action, notes, moderator, resulting_status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                action.content_id.as_str(),
                action.action.as_str(),
                action.notes,
                action.moderator,
                action.resulting_status.as_str(),
                format_datetime(&action.timestamp),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// All entries in append order.
    pub fn get_all(conn: &Connection) -> Result<Vec<ModerationAction>> {
        let mut stmt = conn.prepare(
            "SELECT content_id, action, notes, moderator, resulting_status, created_at
             FROM moderation_actions ORDER BY id ASC",
        )?;

        let raws = stmt
            .query_map([], RawAction::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        raws.into_iter().map(RawAction::decode).collect()
    }

    /// Entries for one content record in append order.
    pub fn get_for_content(conn: &Connection, id: &ContentId) -> Result<Vec<ModerationAction>> {
        let mut stmt = conn.prepare(
            "SELECT content_id, action, notes, moderator, resulting_status, created_at
             FROM moderation_actions WHERE content_id = ?1 ORDER BY id ASC",
        )?;

        let raws = stmt
            .query_map([id.as_str()], RawAction::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        raws.into_iter().map(RawAction::decode).collect()
    }
}

struct RawAction {
    content_id: String,
    action: String,
    notes: Option<String>,
    moderator: String,
    resulting_status: String,
    created_at: String,
}

impl RawAction {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            content_id: row.get(0)?,
            action: row.get(1)?,
            notes: row.get(2)?,
            moderator: row.get(3)?,
            resulting_status: row.get(4)?,
            created_at: row.get(5)?,
        })
    }

    fn decode(self) -> Result<ModerationAction> {
        let action = ModeratorDecision::parse(&self.action).ok_or_else(|| {
            StorageError::Corrupt(format!("unknown moderation action {:?}", self.action))
        })?;
        let resulting_status = ContentStatus::parse(&self.resulting_status).ok_or_else(|| {
            StorageError::Corrupt(format!("unknown status {:?}", self.resulting_status))
        })?;

        Ok(ModerationAction {
            content_id: ContentId::from(self.content_id),
            action,
            notes: self.notes,
            moderator: self.moderator,
            resulting_status,
            timestamp: parse_datetime(&self.created_at)?,
        })
    }
}
