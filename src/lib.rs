//! Refharvest: a resumable API reference harvester
//!
//! This crate implements a checkpointed, rate-limited crawler that walks a
//! Doxygen-generated C# reference site (index page, namespace pages, class
//! pages), extracts typed documentation records, and persists them as a
//! versioned JSON dataset that the bundled renderer turns into Markdown.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod model;
pub mod output;
pub mod progress;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for refharvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error for {url}: {source}")]
    Fetch {
        url: String,
        source: crawler::FetchError,
    },

    #[error("Extraction error for {url}: {source}")]
    Extract {
        url: String,
        source: extract::ExtractError,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Index discovery failed: {0}")]
    IndexDiscovery(String),

    #[error("No dataset found at {0}; run a crawl first")]
    MissingDataset(String),

    #[error("Dataset already exists at {0}; pass --force to replace it")]
    DatasetExists(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for refharvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use model::{ClassDoc, Dataset, NamespaceDoc};
pub use state::{ItemStatus, PageRole, WorkItem};
