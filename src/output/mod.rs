//! Output module: dataset artifact, Markdown rendering, run summaries
//!
//! This module handles everything the crawl engine emits:
//! - Atomic persistence of the structured dataset artifact
//! - Rendering a completed dataset to Markdown pages
//! - Human-readable run summaries

pub mod dataset;
pub mod markdown;
pub mod summary;

pub use dataset::{read_dataset, write_dataset};
pub use markdown::render_markdown;
pub use summary::{format_summary, FailedItem, RunSummary};

use thiserror::Error;

/// Errors that can occur while writing output artifacts
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize dataset: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dataset schema version {found} is not supported (expected {expected})")]
    SchemaMismatch { found: u32, expected: u32 },
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
