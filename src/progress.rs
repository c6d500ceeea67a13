//! Progress observation
//!
//! The coordinator and fetcher report discrete events through the
//! [`CrawlObserver`] trait instead of mutating any global progress state.
//! The observer is passed in explicitly, carries no hidden lifecycle, and is
//! trivially mockable in tests via [`RecordingObserver`].

use crate::state::WorkItem;
use std::fmt;
use std::sync::Mutex;
use std::time::Duration;

/// Phases of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlPhase {
    /// Enumerating namespaces and their class listings
    Discovering,

    /// Bounded-concurrency fetch+extract of class pages
    Extracting,

    /// Attaching records, flushing the dataset, reporting
    Finalizing,
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Discovering => "discovering",
            Self::Extracting => "extracting",
            Self::Finalizing => "finalizing",
        };
        write!(f, "{}", name)
    }
}

/// Receiver of discrete crawl progress events
///
/// All methods have no-op defaults so implementations only override what
/// they care about.
pub trait CrawlObserver: Send + Sync {
    fn phase_started(&self, _phase: CrawlPhase) {}

    fn item_started(&self, _item: &WorkItem) {}

    /// An item finished successfully; `warnings` counts tolerant-extraction
    /// degradations recorded on its record.
    fn item_completed(&self, _item: &WorkItem, _warnings: usize) {}

    fn item_failed(&self, _item: &WorkItem, _kind: &str, _message: &str) {}

    /// The fetcher scheduled a backoff sleep before another attempt.
    fn retry_scheduled(&self, _url: &str, _attempt: u32, _delay: Duration) {}

    fn snapshot_written(&self, _classes: usize) {}
}

/// Observer that forwards events to the tracing subscriber
#[derive(Debug, Default)]
pub struct LogObserver;

impl CrawlObserver for LogObserver {
    fn phase_started(&self, phase: CrawlPhase) {
        tracing::info!("Entering {} phase", phase);
    }

    fn item_started(&self, item: &WorkItem) {
        tracing::debug!(role = %item.role, url = %item.url, "Processing item");
    }

    fn item_completed(&self, item: &WorkItem, warnings: usize) {
        if warnings > 0 {
            tracing::warn!(
                role = %item.role,
                name = %item.name,
                warnings,
                "Item completed with extraction warnings"
            );
        } else {
            tracing::debug!(role = %item.role, name = %item.name, "Item completed");
        }
    }

    fn item_failed(&self, item: &WorkItem, kind: &str, message: &str) {
        tracing::error!(role = %item.role, url = %item.url, kind, message, "Item failed");
    }

    fn retry_scheduled(&self, url: &str, attempt: u32, delay: Duration) {
        tracing::warn!(
            url,
            attempt,
            delay_ms = delay.as_millis() as u64,
            "Retrying after backoff"
        );
    }

    fn snapshot_written(&self, classes: usize) {
        tracing::info!(classes, "Dataset snapshot written");
    }
}

/// Observer that records events for assertions in tests
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the recorded event lines
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl CrawlObserver for RecordingObserver {
    fn phase_started(&self, phase: CrawlPhase) {
        self.push(format!("phase:{}", phase));
    }

    fn item_started(&self, item: &WorkItem) {
        self.push(format!("start:{}", item.key));
    }

    fn item_completed(&self, item: &WorkItem, warnings: usize) {
        self.push(format!("done:{}:{}", item.key, warnings));
    }

    fn item_failed(&self, item: &WorkItem, kind: &str, _message: &str) {
        self.push(format!("failed:{}:{}", item.key, kind));
    }

    fn retry_scheduled(&self, url: &str, attempt: u32, _delay: Duration) {
        self.push(format!("retry:{}:{}", url, attempt));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PageRole;

    #[test]
    fn test_recording_observer_captures_events() {
        let observer = RecordingObserver::new();
        let item = WorkItem::new(
            PageRole::Class,
            "https://example.com/doc/class_a.html",
            "A",
            None,
        );

        observer.phase_started(CrawlPhase::Extracting);
        observer.item_started(&item);
        observer.item_completed(&item, 2);
        observer.item_failed(&item, "network", "HTTP 500");

        let events = observer.events();
        assert_eq!(events[0], "phase:extracting");
        assert_eq!(events[1], "start:/doc/class_a.html");
        assert_eq!(events[2], "done:/doc/class_a.html:2");
        assert_eq!(events[3], "failed:/doc/class_a.html:network");
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(CrawlPhase::Discovering.to_string(), "discovering");
        assert_eq!(CrawlPhase::Finalizing.to_string(), "finalizing");
    }
}
