//! Checkpoint store trait and error types
//!
//! The checkpoint store is the durability contract of the crawl: an item is
//! only considered complete once its row is written, and the in-memory
//! aggregate is updated strictly after the row lands.

use crate::state::{ItemStatus, WorkItem};
use crate::storage::{CheckpointRecord, RunRecord, RunStatus};
use thiserror::Error;

/// Errors that can occur during storage operations
///
/// Storage failures are escalated by the orchestrator: losing durability
/// invalidates the resumability contract, so they abort the run instead of
/// being skipped like per-page failures.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Checkpoint database schema version {found} is not supported (expected {expected})")]
    SchemaVersionMismatch { found: u32, expected: u32 },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for checkpoint store implementations
///
/// All mutations are per-key atomic upserts; callers need no external
/// locking beyond confining the store to one task.
pub trait CheckpointStore {
    // ===== Run Management =====

    /// Creates a new crawl run and returns its ID
    fn create_run(&mut self, root_url: &str, config_hash: &str) -> StorageResult<i64>;

    /// Gets the most recent run, if any
    fn latest_run(&self) -> StorageResult<Option<RunRecord>>;

    /// Marks a run finished with the given status and a finish timestamp
    fn complete_run(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()>;

    // ===== Checkpoint Map =====

    /// Registers a discovered work item as Pending
    ///
    /// A row that already exists keeps its status untouched, so re-discovery
    /// on resume never demotes a Done or Failed entry.
    fn upsert_pending(&mut self, item: &WorkItem) -> StorageResult<()>;

    /// Returns true if the item has been successfully extracted
    fn is_done(&self, key: &str) -> StorageResult<bool>;

    /// Marks an item Done and stores its serialized record
    ///
    /// Increments the attempt counter and clears any prior error.
    fn mark_done(&mut self, key: &str, record_json: &str) -> StorageResult<()>;

    /// Marks an item Failed (or NotFound) with error context
    ///
    /// Never demotes a Done entry; marking a Done key is a no-op.
    fn mark_failed(
        &mut self,
        key: &str,
        status: ItemStatus,
        error_kind: &str,
        error_message: &str,
    ) -> StorageResult<()>;

    /// Gets a single checkpoint record by key
    fn get(&self, key: &str) -> StorageResult<Option<CheckpointRecord>>;

    /// Loads the complete checkpoint map for startup restore
    fn load_all(&self) -> StorageResult<Vec<CheckpointRecord>>;

    /// Counts checkpoint entries in a given status
    fn count_by_status(&self, status: ItemStatus) -> StorageResult<u64>;

    /// Removes every checkpoint row (fresh crawl)
    fn clear(&mut self) -> StorageResult<()>;
}
