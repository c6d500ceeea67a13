//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the checkpoint
//! database.

/// Schema version of the checkpoint database
///
/// Checked at open; a mismatch means the database was written by an
/// incompatible harvester version.
pub const CHECKPOINT_SCHEMA_VERSION: u32 = 1;

/// SQL schema for the checkpoint database
pub const SCHEMA_SQL: &str = r#"
-- Track crawl runs
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    root_url TEXT NOT NULL,
    config_hash TEXT NOT NULL,
    status TEXT NOT NULL
);

-- Durable per-item checkpoint map. One row per work item; the row is the
-- unit of crash durability: a crash between two completions loses at most
-- the in-flight item, never previously completed work.
CREATE TABLE IF NOT EXISTS checkpoints (
    key TEXT PRIMARY KEY,
    role TEXT NOT NULL,
    url TEXT NOT NULL,
    name TEXT NOT NULL,
    namespace_key TEXT,
    status TEXT NOT NULL DEFAULT 'pending',
    attempts INTEGER NOT NULL DEFAULT 0,
    last_attempt_at TEXT,
    error_kind TEXT,
    error_message TEXT,
    record TEXT
);

CREATE INDEX IF NOT EXISTS idx_checkpoints_status ON checkpoints(status);
CREATE INDEX IF NOT EXISTS idx_checkpoints_role ON checkpoints(role);
"#;

/// Initializes the database schema and stamps the schema version
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    let current: u32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if current == 0 {
        conn.pragma_update(None, "user_version", CHECKPOINT_SCHEMA_VERSION)?;
    }
    Ok(())
}

/// Reads the schema version stamped into a database
pub fn read_schema_version(conn: &rusqlite::Connection) -> Result<u32, rusqlite::Error> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_initializes() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(initialize_schema(&conn).is_ok());
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        assert!(initialize_schema(&conn).is_ok());
    }

    #[test]
    fn test_schema_version_stamped() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        assert_eq!(
            read_schema_version(&conn).unwrap(),
            CHECKPOINT_SCHEMA_VERSION
        );
    }

    #[test]
    fn test_tables_exist_after_init() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        for table in ["runs", "checkpoints"] {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "Table {} should exist", table);
        }
    }
}
