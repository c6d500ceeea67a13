use serde::Deserialize;

/// Main configuration structure for refharvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Target site configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Absolute URL of the root index page listing all namespaces
    #[serde(rename = "root-url")]
    pub root_url: String,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Number of concurrent fetch workers
    ///
    /// The shared request gate is the true throughput bound; this only
    /// limits how many fetches can be in flight at once.
    #[serde(default = "default_concurrency")]
    pub concurrency: u32,

    /// Minimum spacing between request departures, in milliseconds,
    /// aggregated across all workers
    #[serde(rename = "request-spacing-ms", default = "default_spacing_ms")]
    pub request_spacing_ms: u64,

    /// Per-request timeout in seconds
    #[serde(rename = "request-timeout-secs", default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Maximum retry attempts for transient failures
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Base backoff delay in milliseconds; doubles on each retry
    #[serde(rename = "retry-base-delay-ms", default = "default_retry_base_ms")]
    pub retry_base_delay_ms: u64,

    /// Whether items that failed in a previous run get one more attempt
    /// on the next invocation
    #[serde(rename = "retry-failed", default = "default_retry_failed")]
    pub retry_failed: bool,

    /// Flush a dataset snapshot after this many completed items
    #[serde(rename = "snapshot-every", default = "default_snapshot_every")]
    pub snapshot_every: u32,
}

fn default_concurrency() -> u32 {
    4
}

fn default_spacing_ms() -> u64 {
    1000
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_base_ms() -> u64 {
    1000
}

fn default_retry_failed() -> bool {
    true
}

fn default_snapshot_every() -> u32 {
    25
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the harvester
    pub name: String,

    /// Version string
    pub version: String,

    /// URL with information about the harvester
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    pub fn header_value(&self) -> String {
        format!("{}/{} (+{})", self.name, self.version, self.contact_url)
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite checkpoint database
    #[serde(rename = "checkpoint-path")]
    pub checkpoint_path: String,

    /// Path of the dataset artifact to write
    #[serde(rename = "dataset-path")]
    pub dataset_path: String,

    /// Directory the Markdown renderer writes into
    #[serde(rename = "docs-dir")]
    pub docs_dir: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crawler_defaults() {
        let config: CrawlerConfig = toml::from_str("").unwrap();
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.request_spacing_ms, 1000);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_base_delay_ms, 1000);
        assert!(config.retry_failed);
        assert_eq!(config.snapshot_every, 25);
    }

    #[test]
    fn test_user_agent_header_value() {
        let ua = UserAgentConfig {
            name: "RefHarvest".to_string(),
            version: "0.2".to_string(),
            contact_url: "https://example.com/about".to_string(),
        };
        assert_eq!(
            ua.header_value(),
            "RefHarvest/0.2 (+https://example.com/about)"
        );
    }
}
