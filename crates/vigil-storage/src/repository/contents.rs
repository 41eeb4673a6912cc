//! Content records repository.

use rusqlite::{params, Connection, OptionalExtension, Row};
use vigil_core::{Content, ContentId, ContentStatus, ContentType, ModerationRecord};

use super::{format_datetime, parse_datetime};
use crate::error::{Result, StorageError};

const COLUMNS: &str = "id, content_type, payload, mime_type, status, submitted_at, report,
                       confidence, moderation_notes, moderated_by, moderated_at";

/// Repository for content records.
pub struct ContentsRepo;

impl ContentsRepo {
    /// Inserts a record or replaces every column of an existing one.
    pub fn upsert(conn: &Connection, content: &Content) -> Result<()> {
        let review = content.moderation.as_ref();

        conn.execute(
            "INSERT INTO contents (id, content_type, payload, mime_type, status, submitted_at,
                                   report, confidence, moderation_notes, moderated_by, moderated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
             ON CONFLICT(id) DO UPDATE SET
                content_type = excluded.content_type,
                payload = excluded.payload,
                mime_type = excluded.mime_type,
                status = excluded.status,
                submitted_at = excluded.submitted_at,
                report = excluded.report,
                confidence = excluded.confidence,
                moderation_notes = excluded.moderation_notes,
                moderated_by = excluded.moderated_by,
                moderated_at = excluded.moderated_at",
            params![
                content.id.as_str(),
                content.content_type.as_str(),
                content.payload,
                content.mime_type,
                content.status.as_str(),
                format_datetime(&content.submitted_at),
                content.report,
                content.confidence,
                review.and_then(|r| r.notes.clone()),
                review.map(|r| r.moderated_by.clone()),
                review.map(|r| format_datetime(&r.moderated_at)),
            ],
        )?;

        Ok(())
    }

    /// Get a record by ID.
    pub fn get_by_id(conn: &Connection, id: &ContentId) -> Result<Option<Content>> {
        let sql = format!("SELECT {} FROM contents WHERE id = ?1", COLUMNS);
        let raw = conn
            .query_row(&sql, [id.as_str()], RawContent::from_row)
            .optional()?;

        raw.map(RawContent::decode).transpose()
    }

    /// Get all records, oldest first.
    pub fn get_all(conn: &Connection) -> Result<Vec<Content>> {
        let sql = format!(
            "SELECT {} FROM contents ORDER BY submitted_at ASC, id ASC",
            COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;

        let raws = stmt
            .query_map([], RawContent::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        raws.into_iter().map(RawContent::decode).collect()
    }

    /// Count records.
    pub fn count(conn: &Connection) -> Result<i64> {
        let count = conn.query_row("SELECT COUNT(*) FROM contents", [], |row| row.get(0))?;
        Ok(count)
    }
}

/// A row as stored, before enum and timestamp decoding.
struct RawContent {
    id: String,
    content_type: String,
    payload: String,
    mime_type: Option<String>,
    status: String,
    submitted_at: String,
    report: Option<String>,
    confidence: f32,
    moderation_notes: Option<String>,
    moderated_by: Option<String>,
    moderated_at: Option<String>,
}

impl RawContent {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            content_type: row.get(1)?,
            payload: row.get(2)?,
            mime_type: row.get(3)?,
            status: row.get(4)?,
            submitted_at: row.get(5)?,
            report: row.get(6)?,
            confidence: row.get(7)?,
            moderation_notes: row.get(8)?,
            moderated_by: row.get(9)?,
            moderated_at: row.get(10)?,
        })
    }

    fn decode(self) -> Result<Content> {
        let content_type = ContentType::parse(&self.content_type).ok_or_else(|| {
            StorageError::Corrupt(format!(
                "content {} has unknown type {:?}",
                self.id, self.content_type
            ))
        })?;
        let status = ContentStatus::parse(&self.status).ok_or_else(|| {
            StorageError::Corrupt(format!(
                "content {} has unknown status {:?}",
                self.id, self.status
            ))
        })?;

        let moderation = match (self.moderated_by, self.moderated_at) {
            (Some(moderated_by), Some(at)) => Some(ModerationRecord {
                notes: self.moderation_notes,
                moderated_by,
                moderated_at: parse_datetime(&at)?,
            }),
            (None, None) => None,
            _ => {
                return Err(StorageError::Corrupt(format!(
                    "content {} has partial review fields",
                    self.id
                )))
            }
        };

        Ok(Content {
            id: ContentId::from(self.id),
            content_type,
            payload: self.payload,
            mime_type: self.mime_type,
            status,
            submitted_at: parse_datetime(&self.submitted_at)?,
            report: self.report,
            confidence: self.confidence,
            moderation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::run_migrations;
    use chrono::{DateTime, Utc};
    use vigil_core::{Classification, ModeratorDecision, Tier};

    fn setup_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn classified(id: &str) -> Content {
        let mut content = Content::new(
            ContentId::from(id),
            ContentType::Image,
            "beach.jpg",
            Some("image/jpeg".to_string()),
            Utc::now(),
        );
        content.apply_classification(Classification::new(Tier::Suspicious, 0.65, "review"));
        content
    }

    #[test]
    fn test_upsert_and_get() {
        let conn = setup_db();
        let content = classified("c1");

        ContentsRepo::upsert(&conn, &content).unwrap();
        let loaded = ContentsRepo::get_by_id(&conn, &content.id).unwrap().unwrap();

        assert_eq!(loaded, content);
    }

    #[test]
    fn test_upsert_replaces_review_fields() {
        let conn = setup_db();
        let mut content = classified("c1");
        ContentsRepo::upsert(&conn, &content).unwrap();

        content.apply_decision(
            ModeratorDecision::Block,
            Some("graphic".to_string()),
            "alice",
            Utc::now(),
        );
        ContentsRepo::upsert(&conn, &content).unwrap();

        let loaded = ContentsRepo::get_by_id(&conn, &content.id).unwrap().unwrap();
        assert_eq!(loaded.status, ContentStatus::Harmful);
        assert_eq!(loaded.moderation, content.moderation);
        assert_eq!(ContentsRepo::count(&conn).unwrap(), 1);
    }

    #[test]
    fn test_get_missing() {
        let conn = setup_db();
        let loaded = ContentsRepo::get_by_id(&conn, &ContentId::from("nope")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_get_all_oldest_first() {
        let conn = setup_db();
        let first = classified("a");
        let mut second = classified("b");
        second.submitted_at = first.submitted_at + chrono::Duration::seconds(5);

        ContentsRepo::upsert(&conn, &second).unwrap();
        ContentsRepo::upsert(&conn, &first).unwrap();

        let all = ContentsRepo::get_all(&conn).unwrap();
        let ids: Vec<&str> = all.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_get_all_orders_within_one_second() {
        let conn = setup_db();
        let base = DateTime::parse_from_rfc3339("2024-03-01T12:30:00Z")
            .unwrap()
            .with_timezone(&Utc);

        let mut whole = classified("z");
        whole.submitted_at = base;
        let mut fraction = classified("a");
        fraction.submitted_at = base + chrono::Duration::microseconds(250);

        ContentsRepo::upsert(&conn, &fraction).unwrap();
        ContentsRepo::upsert(&conn, &whole).unwrap();

        let all = ContentsRepo::get_all(&conn).unwrap();
        let ids: Vec<&str> = all.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["z", "a"]);
    }

    #[test]
    fn test_unknown_status_is_corrupt() {
        let conn = setup_db();
        conn.execute(
            "INSERT INTO contents (id, content_type, payload, status, submitted_at)
             VALUES ('x', 'text', 'hello', 'pending', '2024-01-01T00:00:00Z')",
            [],
        )
        .unwrap();

        let result = ContentsRepo::get_all(&conn);
        assert!(matches!(result, Err(StorageError::Corrupt(_))));
    }

    #[test]
    fn test_partial_review_is_corrupt() {
        let conn = setup_db();
        conn.execute(
            "INSERT INTO contents (id, content_type, payload, status, submitted_at, moderated_by)
             VALUES ('x', 'text', 'hello', 'safe', '2024-01-01T00:00:00Z', 'alice')",
            [],
        )
        .unwrap();

        let result = ContentsRepo::get_by_id(&conn, &ContentId::from("x"));
        assert!(matches!(result, Err(StorageError::Corrupt(_))));
    }
}
