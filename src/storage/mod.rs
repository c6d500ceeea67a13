//! Storage module for the durable checkpoint record
//!
//! This module handles all database operations for the harvester, including:
//! - SQLite database initialization and schema management
//! - Per-item checkpoint persistence (the unit of crawl durability)
//! - Run tracking and resumption support

mod schema;
mod sqlite;
mod traits;

pub use schema::{initialize_schema, CHECKPOINT_SCHEMA_VERSION};
pub use sqlite::SqliteCheckpoint;
pub use traits::{CheckpointStore, StorageError, StorageResult};

use crate::state::{ItemStatus, PageRole};
use std::path::Path;

/// Opens or creates a checkpoint database at the given path
pub fn open_checkpoint(path: &Path) -> StorageResult<SqliteCheckpoint> {
    SqliteCheckpoint::new(path)
}

/// One row of the durable checkpoint map
#[derive(Debug, Clone)]
pub struct CheckpointRecord {
    /// Stable work item key (URL path)
    pub key: String,
    pub role: PageRole,
    pub url: String,
    /// Display name of the entity
    pub name: String,
    /// Owning namespace key, for class items
    pub namespace_key: Option<String>,
    pub status: ItemStatus,
    /// Number of fetch attempts across all runs
    pub attempts: u32,
    pub last_attempt_at: Option<String>,
    /// Error classification when status is Failed ("network", "parse")
    pub error_kind: Option<String>,
    pub error_message: Option<String>,
    /// Serialized extracted record when status is Done
    pub record: Option<String>,
}

/// Represents a crawl run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub root_url: String,
    pub config_hash: String,
    pub status: RunStatus,
}

/// Status of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    CompletedWithErrors,
    Interrupted,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::CompletedWithErrors => "completed_with_errors",
            Self::Interrupted => "interrupted",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "completed_with_errors" => Some(Self::CompletedWithErrors),
            "interrupted" => Some(Self::Interrupted),
            _ => None,
        }
    }
}
