//! SQLite checkpoint store implementation

use crate::state::{ItemStatus, PageRole, WorkItem};
use crate::storage::schema::{initialize_schema, read_schema_version, CHECKPOINT_SCHEMA_VERSION};
use crate::storage::traits::{CheckpointStore, StorageError, StorageResult};
use crate::storage::{CheckpointRecord, RunRecord, RunStatus};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

/// SQLite-backed checkpoint store
///
/// Rows are written incrementally with per-key upserts under WAL, so a
/// crash between two completions loses at most the in-flight item.
pub struct SqliteCheckpoint {
    conn: Connection,
}

impl SqliteCheckpoint {
    /// Opens or creates a checkpoint database at the given path
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        let version = read_schema_version(&conn)?;
        if version != CHECKPOINT_SCHEMA_VERSION {
            return Err(StorageError::SchemaVersionMismatch {
                found: version,
                expected: CHECKPOINT_SCHEMA_VERSION,
            });
        }

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn record_from_row(row: &Row<'_>) -> rusqlite::Result<CheckpointRecord> {
        Ok(CheckpointRecord {
            key: row.get(0)?,
            role: PageRole::from_db_string(&row.get::<_, String>(1)?)
                .unwrap_or(PageRole::Class),
            url: row.get(2)?,
            name: row.get(3)?,
            namespace_key: row.get(4)?,
            status: ItemStatus::from_db_string(&row.get::<_, String>(5)?)
                .unwrap_or(ItemStatus::Pending),
            attempts: row.get(6)?,
            last_attempt_at: row.get(7)?,
            error_kind: row.get(8)?,
            error_message: row.get(9)?,
            record: row.get(10)?,
        })
    }
}

const RECORD_COLUMNS: &str = "key, role, url, name, namespace_key, status, attempts, \
     last_attempt_at, error_kind, error_message, record";

impl CheckpointStore for SqliteCheckpoint {
    // ===== Run Management =====

    fn create_run(&mut self, root_url: &str, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, root_url, config_hash, status) VALUES (?1, ?2, ?3, ?4)",
            params![now, root_url, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, started_at, finished_at, root_url, config_hash, status
             FROM runs ORDER BY id DESC LIMIT 1",
        )?;

        let run = stmt
            .query_row([], |row| {
                Ok(RunRecord {
                    id: row.get(0)?,
                    started_at: row.get(1)?,
                    finished_at: row.get(2)?,
                    root_url: row.get(3)?,
                    config_hash: row.get(4)?,
                    status: RunStatus::from_db_string(&row.get::<_, String>(5)?)
                        .unwrap_or(RunStatus::Running),
                })
            })
            .optional()?;

        Ok(run)
    }

    fn complete_run(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let changed = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2 WHERE id = ?3",
            params![status.to_db_string(), now, run_id],
        )?;
        if changed == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    // ===== Checkpoint Map =====

    fn upsert_pending(&mut self, item: &WorkItem) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO checkpoints (key, role, url, name, namespace_key, status)
             VALUES (?1, ?2, ?3, ?4, ?5, 'pending')
             ON CONFLICT(key) DO NOTHING",
            params![
                item.key,
                item.role.to_db_string(),
                item.url,
                item.name,
                item.namespace_key,
            ],
        )?;
        Ok(())
    }

    fn is_done(&self, key: &str) -> StorageResult<bool> {
        let status: Option<String> = self
            .conn
            .query_row(
                "SELECT status FROM checkpoints WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        Ok(status.as_deref() == Some("done"))
    }

    fn mark_done(&mut self, key: &str, record_json: &str) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "UPDATE checkpoints
             SET status = 'done', attempts = attempts + 1, last_attempt_at = ?1,
                 error_kind = NULL, error_message = NULL, record = ?2
             WHERE key = ?3",
            params![now, record_json, key],
        )?;
        Ok(())
    }

    fn mark_failed(
        &mut self,
        key: &str,
        status: ItemStatus,
        error_kind: &str,
        error_message: &str,
    ) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        // Done is terminal: the guard keeps a late failure report from
        // demoting an already-completed entry.
        self.conn.execute(
            "UPDATE checkpoints
             SET status = ?1, attempts = attempts + 1, last_attempt_at = ?2,
                 error_kind = ?3, error_message = ?4
             WHERE key = ?5 AND status != 'done'",
            params![status.to_db_string(), now, error_kind, error_message, key],
        )?;
        Ok(())
    }

    fn get(&self, key: &str) -> StorageResult<Option<CheckpointRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM checkpoints WHERE key = ?1",
            RECORD_COLUMNS
        ))?;

        let record = stmt
            .query_row(params![key], Self::record_from_row)
            .optional()?;

        Ok(record)
    }

    fn load_all(&self) -> StorageResult<Vec<CheckpointRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM checkpoints", RECORD_COLUMNS))?;

        let records = stmt
            .query_map([], Self::record_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    fn count_by_status(&self, status: ItemStatus) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM checkpoints WHERE status = ?1",
            params![status.to_db_string()],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn clear(&mut self) -> StorageResult<()> {
        self.conn.execute("DELETE FROM checkpoints", [])?;
        Ok(())
    }
}
