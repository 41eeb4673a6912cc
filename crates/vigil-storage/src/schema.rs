//! Database schema and migrations.

use rusqlite::Connection;
use tracing::info;

use crate::error::Result;

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 1;

/// Run all pending migrations.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    let current_version = get_schema_version(conn)?;

    if current_version < SCHEMA_VERSION {
        info!(
            "Running migrations from version {} to {}",
            current_version, SCHEMA_VERSION
        );

        if current_version < 1 {
            migrate_v1(conn)?;
        }

        set_schema_version(conn, SCHEMA_VERSION)?;
        info!("Migrations complete");
    }

    Ok(())
}

fn get_schema_version(conn: &Connection) -> Result<i32> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let version: Option<i32> = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .ok();

    Ok(version.unwrap_or(0))
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Migration v1: content records and the moderation log.
fn migrate_v1(conn: &Connection) -> Result<()> {
    info!("Applying migration v1: Content and moderation log");

    // Review columns are either all NULL or moderated_by/moderated_at set.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS contents (
            id TEXT PRIMARY KEY,
            content_type TEXT NOT NULL,
            payload TEXT NOT NULL,
            mime_type TEXT,
            status TEXT NOT NULL,
            submitted_at TEXT NOT NULL,
            report TEXT,
            confidence REAL NOT NULL DEFAULT 0,
            moderation_notes TEXT,
            moderated_by TEXT,
            moderated_at TEXT
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_contents_status ON contents(status)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_contents_submitted_at ON contents(submitted_at)",
        [],
    )?;

    // Append-only; rowid order is log order. content_id is a plain id with
    // no foreign key, so entries outlive their content.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS moderation_actions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            content_id TEXT NOT NULL,
            action TEXT NOT NULL,
            notes TEXT,
            moderator TEXT NOT NULL,
            resulting_status TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_moderation_actions_content ON moderation_actions(content_id)",
        [],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_run() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let version = get_schema_version(&conn).unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_migrations_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let version = get_schema_version(&conn).unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_actions_outlive_content() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        conn.execute(
            "INSERT INTO contents (id, content_type, payload, status, submitted_at)
             VALUES ('c1', 'text', 'hello', 'harmful', '2024-01-01T00:00:00Z')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO moderation_actions (content_id, action, moderator, resulting_status, created_at)
             VALUES ('c1', 'block', 'alice', 'harmful', '2024-01-01T00:00:01Z')",
            [],
        )
        .unwrap();

        conn.execute("DELETE FROM contents WHERE id = 'c1'", []).unwrap();

        let remaining: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM moderation_actions WHERE content_id = 'c1'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(remaining, 1);
    }
}
