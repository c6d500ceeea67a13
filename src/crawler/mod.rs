//! Crawler module: the resumable fetch+extract engine
//!
//! This module contains the core crawling logic:
//! - The shared request pacing gate
//! - HTTP fetching with retry and backoff
//! - The phase-driven crawl coordinator

mod coordinator;
mod fetcher;
mod gate;

pub use coordinator::{Coordinator, CrawlState};
pub use fetcher::{build_http_client, fetch_page, FetchError, RetryPolicy};
pub use gate::RequestGate;

use crate::config::Config;
use crate::output::summary::RunSummary;
use crate::progress::LogObserver;
use crate::Result;
use std::sync::Arc;
use tokio::sync::watch;

/// Runs a complete crawl with Ctrl-C wired to graceful cancellation
///
/// The stop signal halts dispatch of new work items; in-flight fetches
/// finish or hit their own timeout, and the checkpoint state stays valid
/// for a later resume.
///
/// # Arguments
///
/// * `config` - The validated harvester configuration
/// * `config_hash` - Hash of the configuration file
/// * `fresh` - Discard previous checkpoint state and start over
pub async fn run_crawl(config: Config, config_hash: &str, fresh: bool) -> Result<RunSummary> {
    let (stop_tx, stop_rx) = watch::channel(false);

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Stop requested; finishing in-flight items");
            let _ = stop_tx.send(true);
        }
    });

    let mut coordinator = Coordinator::new(
        config,
        config_hash,
        fresh,
        Arc::new(LogObserver),
        stop_rx,
    )?;
    coordinator.run().await
}
