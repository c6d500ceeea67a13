//! Crawl coordinator - the crawl state machine
//!
//! Drives a run through its phases:
//!
//! 1. `Discovering` - fetch the index, then every namespace page, to
//!    enumerate the complete class work list. Class extraction never starts
//!    before the namespace list is fully known.
//! 2. `Extracting` - a bounded worker pool fetches and extracts class pages
//!    through the shared pacing gate.
//! 3. `Finalizing` - attach completed class records to their namespaces,
//!    write the dataset atomically, and report the run summary.
//!
//! Durability rule: every item outcome is written to the checkpoint store
//! before it becomes visible in the in-memory aggregate, so a crash can
//! never produce dataset content whose checkpoint does not reflect it. The
//! store is only ever touched from the coordinator task; workers communicate
//! outcomes back as values.

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, fetch_page, FetchError, RetryPolicy};
use crate::crawler::gate::RequestGate;
use crate::extract::{extract_class, extract_index, extract_namespace, Listing, NamespacePage};
use crate::model::{ClassDoc, Dataset, NamespaceDoc};
use crate::output::dataset::write_dataset;
use crate::output::summary::{FailedItem, RunSummary};
use crate::progress::{CrawlObserver, CrawlPhase};
use crate::state::{ItemStatus, PageRole, WorkItem};
use crate::storage::{
    open_checkpoint, CheckpointRecord, CheckpointStore, RunStatus, SqliteCheckpoint,
};
use crate::{HarvestError, Result};
use chrono::Utc;
use reqwest::Client;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{watch, Semaphore};
use tokio::task::JoinSet;
use url::Url;

/// A namespace admitted to the aggregate, in index order
#[derive(Debug, Clone)]
struct NamespaceEntry {
    key: String,
    name: String,
    url: String,
    description: Option<String>,
    class_keys: Vec<String>,
}

/// In-memory aggregate of a crawl run
///
/// Owned exclusively by the coordinator; workers never mutate it.
#[derive(Debug, Default)]
pub struct CrawlState {
    namespaces: Vec<NamespaceEntry>,
    class_records: HashMap<String, ClassDoc>,
}

impl CrawlState {
    /// Assembles the dataset artifact from the aggregate
    ///
    /// A class record is attached to a namespace only when the namespace
    /// itself completed, so partial runs yield a consistent tree. Building
    /// twice from the same aggregate yields identical output.
    pub fn to_dataset(&self, captured_at: &str, source_root: &str) -> Dataset {
        let mut dataset = Dataset::new(captured_at.to_string(), source_root.to_string());

        for entry in &self.namespaces {
            let mut ns = NamespaceDoc::new(entry.name.clone(), entry.url.clone());
            ns.description = entry.description.clone();
            ns.classes = entry
                .class_keys
                .iter()
                .filter_map(|key| self.class_records.get(key).cloned())
                .collect();
            dataset.namespaces.push(ns);
        }

        dataset
    }

    /// Number of completed class records
    pub fn class_count(&self) -> usize {
        self.class_records.len()
    }
}

/// Outcome of processing one work item, sent back from a worker
struct ItemOutcome {
    item: WorkItem,
    result: PageResult,
}

enum PageResult {
    Index(Vec<Listing>),
    Namespace(NamespacePage),
    Class(Box<ClassDoc>),
    FetchFailed(FetchError),
    ParseFailed(String),
    /// Stop signal observed before the fetch departed; the item stays
    /// Pending for the next invocation.
    Cancelled,
}

/// Main crawl coordinator
pub struct Coordinator {
    config: Arc<Config>,
    store: SqliteCheckpoint,
    client: Client,
    gate: Arc<RequestGate>,
    policy: RetryPolicy,
    observer: Arc<dyn CrawlObserver>,
    stop: watch::Receiver<bool>,
    run_id: i64,
    root_url: Url,
    captured_at: String,
    state: CrawlState,
    /// Checkpoint rows restored at startup, by key
    restored: HashMap<String, CheckpointRecord>,
    /// Listing descriptions kept aside to backfill sparse class pages
    listing_descriptions: HashMap<String, String>,
    /// Class listings awaiting enumeration, per namespace entry index
    pending_class_listings: Vec<(usize, Vec<Listing>)>,
    completed_since_snapshot: u32,
}

impl Coordinator {
    /// Creates a coordinator, opening (or clearing) the checkpoint store
    ///
    /// # Arguments
    ///
    /// * `config` - The validated harvester configuration
    /// * `config_hash` - Hash of the configuration file, recorded per run
    /// * `fresh` - Discard any previous checkpoint state and start over
    /// * `observer` - Receiver of progress events
    /// * `stop` - External stop signal; flipping it to true halts dispatch
    pub fn new(
        config: Config,
        config_hash: &str,
        fresh: bool,
        observer: Arc<dyn CrawlObserver>,
        stop: watch::Receiver<bool>,
    ) -> Result<Self> {
        let root_url = Url::parse(&config.site.root_url)?;

        let mut store = open_checkpoint(Path::new(&config.output.checkpoint_path))?;
        if fresh {
            tracing::info!("Starting fresh: clearing previous checkpoint state");
            store.clear()?;
        }

        // Resume an interrupted run, otherwise open a new one.
        let run_id = match store.latest_run()? {
            Some(run) if run.status == RunStatus::Running && !fresh => {
                tracing::info!("Resuming interrupted run {}", run.id);
                if run.config_hash != config_hash {
                    tracing::warn!(
                        "Configuration changed since run {} started; resuming anyway",
                        run.id
                    );
                }
                run.id
            }
            _ => store.create_run(config.site.root_url.as_str(), config_hash)?,
        };

        let client = build_http_client(
            &config.user_agent.header_value(),
            Duration::from_secs(config.crawler.request_timeout_secs),
        )?;
        let gate = Arc::new(RequestGate::new(Duration::from_millis(
            config.crawler.request_spacing_ms,
        )));
        let policy = RetryPolicy::new(
            config.crawler.max_retries,
            Duration::from_millis(config.crawler.retry_base_delay_ms),
        );

        Ok(Self {
            config: Arc::new(config),
            store,
            client,
            gate,
            policy,
            observer,
            stop,
            run_id,
            root_url,
            captured_at: Utc::now().to_rfc3339(),
            state: CrawlState::default(),
            restored: HashMap::new(),
            listing_descriptions: HashMap::new(),
            pending_class_listings: Vec::new(),
            completed_since_snapshot: 0,
        })
    }

    /// Runs the crawl to completion (or interruption) and returns a summary
    pub async fn run(&mut self) -> Result<RunSummary> {
        let started = Instant::now();

        // Restore the checkpoint partition from any previous invocation.
        self.restored = self
            .store
            .load_all()?
            .into_iter()
            .map(|rec| (rec.key.clone(), rec))
            .collect();
        if !self.restored.is_empty() {
            tracing::info!(
                "Restored {} checkpoint entries from a previous run",
                self.restored.len()
            );
        }

        // ===== Discovering =====
        self.observer.phase_started(CrawlPhase::Discovering);

        let listings = self.resolve_index().await?;
        if listings.is_empty() {
            tracing::warn!("Index page listed zero namespaces; output will be empty");
        }

        let interrupted_discovery = self.resolve_namespaces(&listings).await?;

        // ===== Extracting =====
        let mut interrupted = interrupted_discovery;
        if !interrupted {
            self.observer.phase_started(CrawlPhase::Extracting);
            let class_items = self.build_class_items()?;
            tracing::info!(
                "Discovered {} classes across {} namespaces ({} already done)",
                class_items.len() + self.state.class_records.len(),
                self.state.namespaces.len(),
                self.state.class_records.len()
            );
            interrupted = self.process_items(class_items).await?;
        }

        // ===== Finalizing =====
        self.observer.phase_started(CrawlPhase::Finalizing);
        self.finalize(started.elapsed(), interrupted)
    }

    // ===== Discovering =====

    /// Fetches (or rehydrates) the index page and its namespace listing
    ///
    /// Index failure is fatal: without the namespace list no work can be
    /// enumerated.
    async fn resolve_index(&mut self) -> Result<Vec<Listing>> {
        let index_item = WorkItem::new(
            PageRole::Index,
            self.root_url.as_str(),
            "namespace index",
            None,
        );
        self.store.upsert_pending(&index_item)?;

        if let Some(listings) = self.rehydrate_index(&index_item.key) {
            tracing::info!("Index restored from checkpoint ({} namespaces)", listings.len());
            return Ok(listings);
        }

        let key = index_item.key.clone();
        self.process_items(vec![index_item]).await?;

        match self.rehydrate_index(&key) {
            Some(listings) => Ok(listings),
            // A stop signal before the index even fetched ends the run
            // cleanly with nothing discovered; the item stays Pending.
            None if *self.stop.borrow() => Ok(Vec::new()),
            None => {
                let record = self.store.get(&key)?;
                let reason = record
                    .and_then(|r| r.error_message)
                    .unwrap_or_else(|| "index page could not be processed".to_string());
                Err(HarvestError::IndexDiscovery(reason))
            }
        }
    }

    /// Reads the index listing back out of its Done checkpoint entry
    fn rehydrate_index(&self, key: &str) -> Option<Vec<Listing>> {
        let record = self.lookup_done(key)?;
        match serde_json::from_str::<Vec<Listing>>(&record) {
            Ok(listings) => Some(listings),
            Err(e) => {
                tracing::warn!("Discarding unreadable index checkpoint record: {}", e);
                None
            }
        }
    }

    /// Fetches namespace pages (bounded concurrency) and admits them to the
    /// aggregate in index order
    async fn resolve_namespaces(&mut self, listings: &[Listing]) -> Result<bool> {
        let mut items = Vec::new();
        let mut order = Vec::new();

        for listing in listings {
            let item = WorkItem::new(PageRole::Namespace, listing.url.clone(), listing.name.clone(), None);
            self.store.upsert_pending(&item)?;
            if let Some(desc) = &listing.description {
                self.listing_descriptions
                    .insert(item.key.clone(), desc.clone());
            }
            order.push((item.key.clone(), listing.clone()));
            if self.needs_fetch(&item.key) {
                items.push(item);
            }
        }

        let interrupted = self.process_items(items).await?;

        // Admit namespaces in index order; failed or skipped pages simply
        // have no entry and their classes are never enumerated.
        for (key, listing) in order {
            let Some(record) = self.lookup_done(&key) else {
                continue;
            };
            let page: NamespacePage = match serde_json::from_str(&record) {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!("Unreadable namespace checkpoint record for {}: {}", key, e);
                    continue;
                }
            };
            self.admit_namespace(&key, &listing, page);
        }

        Ok(interrupted)
    }

    /// Adds a completed namespace page to the aggregate
    fn admit_namespace(&mut self, key: &str, listing: &Listing, page: NamespacePage) {
        for class in &page.classes {
            if let Some(desc) = &class.description {
                let class_key = crate::state::item_key(&class.url);
                self.listing_descriptions.insert(class_key, desc.clone());
            }
        }

        self.state.namespaces.push(NamespaceEntry {
            key: key.to_string(),
            name: listing.name.clone(),
            url: listing.url.clone(),
            description: page
                .description
                .clone()
                .or_else(|| listing.description.clone()),
            class_keys: Vec::new(),
        });

        // Stash the class listings on the entry after registration.
        let entry_index = self.state.namespaces.len() - 1;
        let classes = page.classes;
        self.pending_class_listings.push((entry_index, classes));
    }

    /// Enumerates class work items from the admitted namespaces
    ///
    /// Done entries rehydrate straight into the aggregate; Failed entries
    /// from a previous invocation are retried once when configured; NotFound
    /// entries stay skipped.
    fn build_class_items(&mut self) -> Result<Vec<WorkItem>> {
        let mut items = Vec::new();
        let mut seen_keys: HashSet<String> = HashSet::new();

        let pending = std::mem::take(&mut self.pending_class_listings);
        for (entry_index, classes) in pending {
            for listing in classes {
                let item = WorkItem::new(
                    PageRole::Class,
                    listing.url.clone(),
                    listing.name.clone(),
                    Some(self.state.namespaces[entry_index].key.clone()),
                );
                if !seen_keys.insert(item.key.clone()) {
                    continue;
                }
                self.store.upsert_pending(&item)?;
                self.state.namespaces[entry_index]
                    .class_keys
                    .push(item.key.clone());

                if let Some(record) = self.lookup_done(&item.key) {
                    match serde_json::from_str::<ClassDoc>(&record) {
                        Ok(doc) => {
                            self.state.class_records.insert(item.key.clone(), doc);
                        }
                        Err(e) => {
                            tracing::warn!(
                                "Unreadable class checkpoint record for {}: {}; refetching",
                                item.key,
                                e
                            );
                            items.push(item);
                        }
                    }
                    continue;
                }

                if self.needs_fetch(&item.key) {
                    items.push(item);
                }
            }
        }

        Ok(items)
    }

    /// Whether an item must actually be fetched this invocation
    ///
    /// Done and NotFound are terminal. Failed from a previous invocation
    /// gets one more attempt when `retry-failed` is set.
    fn needs_fetch(&self, key: &str) -> bool {
        match self.restored.get(key) {
            None => true,
            Some(rec) => match rec.status {
                ItemStatus::Pending => true,
                ItemStatus::Done | ItemStatus::NotFound => false,
                ItemStatus::Failed => self.config.crawler.retry_failed,
            },
        }
    }

    /// Returns the stored record JSON when the item is checkpointed Done
    fn lookup_done(&self, key: &str) -> Option<String> {
        let rec = self.restored.get(key)?;
        if rec.status == ItemStatus::Done {
            rec.record.clone()
        } else {
            None
        }
    }

    // ===== Worker pool =====

    /// Runs a batch of work items through the bounded worker pool
    ///
    /// Returns true when the stop signal interrupted the batch. Outcomes are
    /// applied on the coordinator task as workers finish, in completion
    /// order; per-key exclusivity is all the consistency this needs.
    async fn process_items(&mut self, items: Vec<WorkItem>) -> Result<bool> {
        if items.is_empty() {
            return Ok(*self.stop.borrow());
        }

        let semaphore = Arc::new(Semaphore::new(self.config.crawler.concurrency as usize));
        let mut join_set: JoinSet<ItemOutcome> = JoinSet::new();

        for item in items {
            let client = self.client.clone();
            let gate = Arc::clone(&self.gate);
            let policy = self.policy;
            let observer = Arc::clone(&self.observer);
            let stop = self.stop.clone();
            let semaphore = Arc::clone(&semaphore);

            join_set.spawn(async move {
                process_one(item, client, gate, policy, observer, stop, semaphore).await
            });
        }

        let mut interrupted = false;
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(outcome) => {
                    if matches!(outcome.result, PageResult::Cancelled) {
                        interrupted = true;
                    }
                    self.handle_outcome(outcome)?;
                }
                Err(e) => {
                    tracing::error!("Worker task failed: {}", e);
                }
            }
        }

        Ok(interrupted || *self.stop.borrow())
    }

    /// Applies one worker outcome: checkpoint write first, then aggregate
    fn handle_outcome(&mut self, outcome: ItemOutcome) -> Result<()> {
        let item = outcome.item;

        match outcome.result {
            PageResult::Cancelled => {
                tracing::debug!("Item {} cancelled before dispatch", item.key);
            }

            PageResult::Index(listings) => {
                let json = serde_json::to_string(&listings)
                    .map_err(|e| HarvestError::IndexDiscovery(e.to_string()))?;
                self.store.mark_done(&item.key, &json)?;
                self.restored.insert(
                    item.key.clone(),
                    done_record(&item, json),
                );
                self.observer.item_completed(&item, 0);
            }

            PageResult::Namespace(page) => {
                let json = serde_json::to_string(&page).map_err(|e| {
                    crate::storage::StorageError::Serialization(e.to_string())
                })?;
                self.store.mark_done(&item.key, &json)?;
                self.restored.insert(item.key.clone(), done_record(&item, json));
                self.observer.item_completed(&item, 0);
            }

            PageResult::Class(mut doc) => {
                // A sparse class page keeps the description from its listing.
                if doc.description.is_none() {
                    doc.description = self.listing_descriptions.get(&item.key).cloned();
                }
                let json = serde_json::to_string(&doc).map_err(|e| {
                    crate::storage::StorageError::Serialization(e.to_string())
                })?;
                // Checkpoint durability precedes aggregate visibility.
                self.store.mark_done(&item.key, &json)?;
                let warnings = doc.warnings.len();
                self.state.class_records.insert(item.key.clone(), *doc);
                self.observer.item_completed(&item, warnings);
                self.maybe_snapshot()?;
            }

            PageResult::FetchFailed(error) => {
                let status = match &error {
                    FetchError::NotFound { .. } => ItemStatus::NotFound,
                    FetchError::Network { .. } => ItemStatus::Failed,
                };
                let message = error.to_string();
                self.store
                    .mark_failed(&item.key, status, error.kind(), &message)?;
                self.observer.item_failed(&item, error.kind(), &message);
            }

            PageResult::ParseFailed(message) => {
                self.store
                    .mark_failed(&item.key, ItemStatus::Failed, "parse", &message)?;
                self.observer.item_failed(&item, "parse", &message);
            }
        }

        Ok(())
    }

    /// Flushes a dataset snapshot on the configured cadence
    fn maybe_snapshot(&mut self) -> Result<()> {
        self.completed_since_snapshot += 1;
        if self.completed_since_snapshot < self.config.crawler.snapshot_every {
            return Ok(());
        }
        self.completed_since_snapshot = 0;

        let dataset = self
            .state
            .to_dataset(&self.captured_at, self.root_url.as_str());
        write_dataset(&dataset, Path::new(&self.config.output.dataset_path))?;
        self.observer.snapshot_written(self.state.class_count());
        Ok(())
    }

    // ===== Finalizing =====

    /// Writes the final dataset, closes the run, and builds the summary
    fn finalize(&mut self, elapsed: Duration, interrupted: bool) -> Result<RunSummary> {
        let dataset = self
            .state
            .to_dataset(&self.captured_at, self.root_url.as_str());
        write_dataset(&dataset, Path::new(&self.config.output.dataset_path))?;

        let records = self.store.load_all()?;
        let mut summary = RunSummary {
            run_id: self.run_id,
            root_url: self.root_url.to_string(),
            done: 0,
            failed: 0,
            not_found: 0,
            pending: 0,
            namespaces_captured: dataset.namespaces.len(),
            classes_captured: dataset.class_count(),
            items_with_warnings: self
                .state
                .class_records
                .values()
                .filter(|c| !c.warnings.is_empty())
                .count(),
            failed_items: Vec::new(),
            interrupted,
            duration: elapsed,
        };

        for record in records {
            match record.status {
                ItemStatus::Done => summary.done += 1,
                ItemStatus::Pending => summary.pending += 1,
                ItemStatus::NotFound => {
                    summary.not_found += 1;
                    summary.failed_items.push(FailedItem {
                        url: record.url,
                        kind: "not_found".to_string(),
                        message: record
                            .error_message
                            .unwrap_or_else(|| "page not found".to_string()),
                    });
                }
                ItemStatus::Failed => {
                    summary.failed += 1;
                    summary.failed_items.push(FailedItem {
                        url: record.url,
                        kind: record.error_kind.unwrap_or_else(|| "unknown".to_string()),
                        message: record.error_message.unwrap_or_default(),
                    });
                }
            }
        }

        let status = if interrupted {
            RunStatus::Interrupted
        } else if summary.failed > 0 {
            RunStatus::CompletedWithErrors
        } else {
            RunStatus::Completed
        };
        self.store.complete_run(self.run_id, status)?;

        Ok(summary)
    }
}

/// Builds a synthetic Done record for the in-memory restored map
///
/// Keeps rehydration lookups uniform after this invocation completes an
/// item itself.
fn done_record(item: &WorkItem, record: String) -> CheckpointRecord {
    CheckpointRecord {
        key: item.key.clone(),
        role: item.role,
        url: item.url.clone(),
        name: item.name.clone(),
        namespace_key: item.namespace_key.clone(),
        status: ItemStatus::Done,
        attempts: 1,
        last_attempt_at: None,
        error_kind: None,
        error_message: None,
        record: Some(record),
    }
}

/// Fetches and extracts one work item on a worker task
///
/// Workers acquire a concurrency permit, then the pacing gate (inside the
/// fetcher), and return every outcome as a value.
async fn process_one(
    item: WorkItem,
    client: Client,
    gate: Arc<RequestGate>,
    policy: RetryPolicy,
    observer: Arc<dyn CrawlObserver>,
    stop: watch::Receiver<bool>,
    semaphore: Arc<Semaphore>,
) -> ItemOutcome {
    if *stop.borrow() {
        return ItemOutcome {
            item,
            result: PageResult::Cancelled,
        };
    }

    let Ok(_permit) = semaphore.acquire_owned().await else {
        return ItemOutcome {
            item,
            result: PageResult::Cancelled,
        };
    };

    // Re-check after possibly waiting on the permit: no new fetch departs
    // once the stop signal is set.
    if *stop.borrow() {
        return ItemOutcome {
            item,
            result: PageResult::Cancelled,
        };
    }

    observer.item_started(&item);

    let page_url = match Url::parse(&item.url) {
        Ok(url) => url,
        Err(e) => {
            return ItemOutcome {
                result: PageResult::ParseFailed(format!("invalid url: {e}")),
                item,
            };
        }
    };

    let body = match fetch_page(&client, &gate, &policy, observer.as_ref(), &item.url).await {
        Ok(body) => body,
        Err(error) => {
            return ItemOutcome {
                result: PageResult::FetchFailed(error),
                item,
            };
        }
    };

    let result = match item.role {
        PageRole::Index => match extract_index(&body, &page_url) {
            Ok(listings) => PageResult::Index(listings),
            Err(crate::extract::ExtractError::Parse(msg)) => PageResult::ParseFailed(msg),
        },
        PageRole::Namespace => match extract_namespace(&body, &page_url) {
            Ok(page) => PageResult::Namespace(page),
            Err(crate::extract::ExtractError::Parse(msg)) => PageResult::ParseFailed(msg),
        },
        PageRole::Class => match extract_class(&body, &page_url) {
            Ok((doc, _warnings)) => PageResult::Class(Box::new(doc)),
            Err(crate::extract::ExtractError::Parse(msg)) => PageResult::ParseFailed(msg),
        },
    };

    ItemOutcome { item, result }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> CrawlState {
        let mut state = CrawlState::default();
        state.namespaces.push(NamespaceEntry {
            key: "/doc/namespace_yukar.html".to_string(),
            name: "Yukar".to_string(),
            url: "https://example.com/doc/namespace_yukar.html".to_string(),
            description: Some("Engine namespace".to_string()),
            class_keys: vec![
                "/doc/class_yukar_1_1_map.html".to_string(),
                "/doc/class_yukar_1_1_battle.html".to_string(),
            ],
        });
        state.class_records.insert(
            "/doc/class_yukar_1_1_map.html".to_string(),
            ClassDoc::new("Map", "Yukar.Map", "https://example.com/doc/class_yukar_1_1_map.html"),
        );
        state
    }

    #[test]
    fn test_to_dataset_attaches_only_completed_classes() {
        let state = sample_state();
        let dataset = state.to_dataset("2024-01-01T00:00:00Z", "https://example.com/doc/");

        assert_eq!(dataset.namespaces.len(), 1);
        // Battle never completed, so only Map is attached.
        assert_eq!(dataset.namespaces[0].classes.len(), 1);
        assert_eq!(dataset.namespaces[0].classes[0].name, "Map");
        assert_eq!(
            dataset.namespaces[0].description.as_deref(),
            Some("Engine namespace")
        );
    }

    #[test]
    fn test_to_dataset_is_deterministic() {
        let state = sample_state();
        let a = state.to_dataset("2024-01-01T00:00:00Z", "https://example.com/doc/");
        let b = state.to_dataset("2024-01-01T00:00:00Z", "https://example.com/doc/");

        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_to_dataset_preserves_namespace_order() {
        let mut state = CrawlState::default();
        for name in ["Zeta", "Alpha", "Mid"] {
            state.namespaces.push(NamespaceEntry {
                key: format!("/doc/namespace_{}.html", name.to_lowercase()),
                name: name.to_string(),
                url: format!("https://example.com/doc/namespace_{}.html", name.to_lowercase()),
                description: None,
                class_keys: Vec::new(),
            });
        }

        let dataset = state.to_dataset("t", "r");
        let names: Vec<&str> = dataset.namespaces.iter().map(|n| n.name.as_str()).collect();
        // Discovery (index) order, not alphabetical.
        assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn test_dataset_meta_carries_capture_info() {
        let state = CrawlState::default();
        let dataset = state.to_dataset("2024-06-01T12:00:00Z", "https://example.com/root.html");

        assert_eq!(dataset.meta.captured_at, "2024-06-01T12:00:00Z");
        assert_eq!(dataset.meta.source_root, "https://example.com/root.html");
    }
}
