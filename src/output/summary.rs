//! Run summary reporting
//!
//! The summary a run prints at Finalizing: Done / Failed / NotFound counts
//! and the explicit list of failed URLs, so a user can inspect or re-run
//! exactly the items that were skipped.

use crate::storage::RunStatus;
use std::time::Duration;

/// One item that did not complete, with its classification
#[derive(Debug, Clone)]
pub struct FailedItem {
    pub url: String,
    /// "network", "parse", or "not_found"
    pub kind: String,
    pub message: String,
}

/// Statistics and failure detail for one crawl invocation
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: i64,
    pub root_url: String,

    // Checkpoint counts across the whole lineage
    pub done: u64,
    pub failed: u64,
    pub not_found: u64,
    pub pending: u64,

    // What made it into the dataset artifact
    pub namespaces_captured: usize,
    pub classes_captured: usize,

    /// Classes whose extraction degraded somewhere (tolerant warnings)
    pub items_with_warnings: usize,

    pub failed_items: Vec<FailedItem>,

    /// True when a stop signal cut the run short
    pub interrupted: bool,

    pub duration: Duration,
}

impl RunSummary {
    /// Whether every discovered item completed successfully
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && !self.interrupted
    }

    /// The run status this summary corresponds to
    pub fn run_status(&self) -> RunStatus {
        if self.interrupted {
            RunStatus::Interrupted
        } else if self.failed > 0 {
            RunStatus::CompletedWithErrors
        } else {
            RunStatus::Completed
        }
    }
}

/// Formats a run summary for terminal output
pub fn format_summary(summary: &RunSummary) -> String {
    let mut out = String::new();

    out.push_str(&format!("Run {} summary\n", summary.run_id));
    out.push_str(&format!("  Source: {}\n", summary.root_url));
    out.push_str(&format!(
        "  Duration: {:.1}s\n",
        summary.duration.as_secs_f64()
    ));
    if summary.interrupted {
        out.push_str("  Status: INTERRUPTED (resume with the same command)\n");
    }
    out.push_str(&format!(
        "  Items: {} done, {} failed, {} not found, {} pending\n",
        summary.done, summary.failed, summary.not_found, summary.pending
    ));
    out.push_str(&format!(
        "  Dataset: {} namespaces, {} classes ({} with extraction warnings)\n",
        summary.namespaces_captured, summary.classes_captured, summary.items_with_warnings
    ));

    if !summary.failed_items.is_empty() {
        out.push_str("  Skipped URLs:\n");
        for item in &summary.failed_items {
            out.push_str(&format!(
                "    [{}] {} ({})\n",
                item.kind, item.url, item.message
            ));
        }
    }

    out
}
