//! Configuration validation
//!
//! Checks value ranges and URL shape before a crawl is allowed to start, so
//! misconfiguration surfaces as one clear error instead of a mid-run failure.

use crate::config::types::Config;
use crate::ConfigError;
use url::Url;

/// Validates a parsed configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    // Root URL must be an absolute http(s) URL.
    let root = Url::parse(&config.site.root_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", config.site.root_url, e)))?;
    if root.scheme() != "http" && root.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "root-url must be http or https, got {}",
            root.scheme()
        )));
    }

    if config.crawler.concurrency == 0 {
        return Err(ConfigError::Validation(
            "crawler.concurrency must be at least 1".to_string(),
        ));
    }

    if config.crawler.request_spacing_ms == 0 {
        return Err(ConfigError::Validation(
            "crawler.request-spacing-ms must be greater than 0".to_string(),
        ));
    }

    if config.crawler.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "crawler.request-timeout-secs must be greater than 0".to_string(),
        ));
    }

    if config.crawler.max_retries > 10 {
        return Err(ConfigError::Validation(format!(
            "crawler.max-retries of {} is unreasonably high (limit 10)",
            config.crawler.max_retries
        )));
    }

    if config.crawler.snapshot_every == 0 {
        return Err(ConfigError::Validation(
            "crawler.snapshot-every must be greater than 0".to_string(),
        ));
    }

    if config.user_agent.name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent.name must not be empty".to_string(),
        ));
    }

    for (field, value) in [
        ("output.checkpoint-path", &config.output.checkpoint_path),
        ("output.dataset-path", &config.output.dataset_path),
        ("output.docs-dir", &config.output.docs_dir),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "{} must not be empty",
                field
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::{CrawlerConfig, OutputConfig, SiteConfig, UserAgentConfig};

    fn valid_config() -> Config {
        Config {
            site: SiteConfig {
                root_url: "https://example.com/doc/namespaces.html".to_string(),
            },
            crawler: CrawlerConfig {
                concurrency: 4,
                request_spacing_ms: 1000,
                request_timeout_secs: 30,
                max_retries: 3,
                retry_base_delay_ms: 1000,
                retry_failed: true,
                snapshot_every: 25,
            },
            user_agent: UserAgentConfig {
                name: "RefHarvest".to_string(),
                version: "0.2".to_string(),
                contact_url: "https://example.com/about".to_string(),
            },
            output: OutputConfig {
                checkpoint_path: "./harvest.db".to_string(),
                dataset_path: "./dataset.json".to_string(),
                docs_dir: "./docs".to_string(),
            },
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_rejects_zero_concurrency() {
        let mut config = valid_config();
        config.crawler.concurrency = 0;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_rejects_zero_spacing() {
        let mut config = valid_config();
        config.crawler.request_spacing_ms = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_non_http_root() {
        let mut config = valid_config();
        config.site.root_url = "ftp://example.com/doc".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_rejects_unparsable_root() {
        let mut config = valid_config();
        config.site.root_url = "not a url".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_rejects_empty_output_path() {
        let mut config = valid_config();
        config.output.dataset_path = "  ".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_excessive_retries() {
        let mut config = valid_config();
        config.crawler.max_retries = 50;
        assert!(validate(&config).is_err());
    }
}
