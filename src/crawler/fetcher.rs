//! HTTP fetcher
//!
//! One GET per call with timeout, retry-with-backoff, and the shared pacing
//! gate applied before every attempt. The fetcher knows nothing about page
//! semantics; it returns the body or a classified [`FetchError`], never an
//! uncaught fault.
//!
//! Retry classification:
//!
//! | Condition          | Action                        |
//! |--------------------|-------------------------------|
//! | Timeout            | Retry with backoff            |
//! | Connection error   | Retry with backoff            |
//! | HTTP 5xx           | Retry with backoff            |
//! | HTTP 429           | Retry with backoff            |
//! | HTTP 404           | Terminal NotFound, no retry   |
//! | Other HTTP 4xx     | Terminal NotFound-class       |

use crate::crawler::gate::RequestGate;
use crate::progress::CrawlObserver;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Classified fetch failure
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transient failure that survived the whole retry budget
    #[error("network failure after {attempts} attempts: {message}")]
    Network { message: String, attempts: u32 },

    /// The page is legitimately absent (or otherwise terminally rejected)
    #[error("not found (HTTP {status})")]
    NotFound { status: u16 },
}

impl FetchError {
    /// Short classification string recorded in the checkpoint
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network { .. } => "network",
            Self::NotFound { .. } => "not_found",
        }
    }
}

/// Retry budget and backoff schedule
///
/// The schedule is a pure function of the completed attempt count, so the
/// policy is testable without any clock: retry `n` sleeps
/// `base_delay * 2^(n-1)`.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the initial attempt
    pub max_retries: u32,

    /// First backoff delay; doubles each retry
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Backoff before the next attempt, given how many attempts completed
    ///
    /// Returns None once the retry budget is exhausted.
    pub fn backoff_delay(&self, completed_attempts: u32) -> Option<Duration> {
        if completed_attempts > self.max_retries {
            return None;
        }
        let exponent = completed_attempts.saturating_sub(1).min(16);
        Some(self.base_delay * 2u32.pow(exponent))
    }
}

impl Default for RetryPolicy {
    /// 3 retries starting at 1 second: 1s, 2s, 4s
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

/// Builds the HTTP client used for the whole crawl
pub fn build_http_client(user_agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL, pacing through the gate and retrying transient failures
///
/// # Arguments
///
/// * `client` - The shared HTTP client
/// * `gate` - The shared pacing gate; acquired before every attempt,
///   including retries, so retry storms stay inside the rate bound
/// * `policy` - Retry budget and backoff schedule
/// * `observer` - Receives a retry event before each backoff sleep
/// * `url` - The URL to fetch
pub async fn fetch_page(
    client: &Client,
    gate: &RequestGate,
    policy: &RetryPolicy,
    observer: &dyn CrawlObserver,
    url: &str,
) -> Result<String, FetchError> {
    let mut completed: u32 = 0;

    loop {
        gate.acquire().await;
        completed += 1;

        let failure = match client.get(url).send().await {
            Ok(response) => {
                let status = response.status();

                if status.is_success() {
                    match response.text().await {
                        Ok(body) => return Ok(body),
                        Err(e) => format!("body read failed: {e}"),
                    }
                } else if status == StatusCode::NOT_FOUND {
                    return Err(FetchError::NotFound { status: 404 });
                } else if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                    format!("HTTP {}", status.as_u16())
                } else {
                    // Other 4xx: the origin has no auth, so these are
                    // permanent for this site. Terminal, no retry.
                    return Err(FetchError::NotFound {
                        status: status.as_u16(),
                    });
                }
            }
            Err(e) => {
                if e.is_timeout() {
                    "request timeout".to_string()
                } else if e.is_connect() {
                    format!("connection failed: {e}")
                } else {
                    format!("{e}")
                }
            }
        };

        match policy.backoff_delay(completed) {
            Some(delay) => {
                let delay = delay + jitter(delay);
                observer.retry_scheduled(url, completed, delay);
                tokio::time::sleep(delay).await;
            }
            None => {
                return Err(FetchError::Network {
                    message: failure,
                    attempts: completed,
                });
            }
        }
    }
}

/// Random jitter up to a quarter of the backoff delay
///
/// Spreads concurrent workers' retries apart so they do not hit the origin
/// in lockstep after a shared outage.
fn jitter(delay: Duration) -> Duration {
    let max_ms = (delay.as_millis() as u64 / 4).clamp(1, 250);
    Duration::from_millis(xorshift_ms(max_ms))
}

// Seeded from the high-resolution clock; good enough for jitter, not crypto.
fn xorshift_ms(max_ms: u64) -> u64 {
    let mut x = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64;
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    x % max_ms
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::RecordingObserver;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_policy() -> RetryPolicy {
        RetryPolicy::new(2, Duration::from_millis(10))
    }

    fn open_gate() -> RequestGate {
        RequestGate::new(Duration::from_millis(1))
    }

    #[test]
    fn test_backoff_schedule_doubles() {
        let policy = RetryPolicy::new(3, Duration::from_secs(1));
        assert_eq!(policy.backoff_delay(1), Some(Duration::from_secs(1)));
        assert_eq!(policy.backoff_delay(2), Some(Duration::from_secs(2)));
        assert_eq!(policy.backoff_delay(3), Some(Duration::from_secs(4)));
        assert_eq!(policy.backoff_delay(4), None);
    }

    #[test]
    fn test_zero_retries_fails_immediately() {
        let policy = RetryPolicy::new(0, Duration::from_secs(1));
        assert_eq!(policy.backoff_delay(1), None);
    }

    #[test]
    fn test_jitter_is_bounded() {
        for _ in 0..100 {
            let j = jitter(Duration::from_secs(1));
            assert!(j <= Duration::from_millis(250));
        }
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let client = build_http_client("test", Duration::from_secs(5)).unwrap();
        let observer = RecordingObserver::new();
        let body = fetch_page(
            &client,
            &open_gate(),
            &fast_policy(),
            &observer,
            &format!("{}/page", server.uri()),
        )
        .await
        .unwrap();

        assert_eq!(body, "<html>ok</html>");
        assert!(observer.events().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_404_is_terminal_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let client = build_http_client("test", Duration::from_secs(5)).unwrap();
        let observer = RecordingObserver::new();
        let err = fetch_page(
            &client,
            &open_gate(),
            &fast_policy(),
            &observer,
            &format!("{}/gone", server.uri()),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, FetchError::NotFound { status: 404 }));
        assert_eq!(err.kind(), "not_found");
    }

    #[tokio::test]
    async fn test_fetch_500_retries_then_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3) // initial attempt + 2 retries
            .mount(&server)
            .await;

        let client = build_http_client("test", Duration::from_secs(5)).unwrap();
        let observer = RecordingObserver::new();
        let err = fetch_page(
            &client,
            &open_gate(),
            &fast_policy(),
            &observer,
            &format!("{}/broken", server.uri()),
        )
        .await
        .unwrap_err();

        match err {
            FetchError::Network { attempts, .. } => assert_eq!(attempts, 3),
            other => panic!("expected network failure, got {other:?}"),
        }
        assert_eq!(observer.events().len(), 2, "one retry event per backoff");
    }

    #[tokio::test]
    async fn test_fetch_recovers_after_transient_500() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(200).set_body_string("recovered"))
            .mount(&server)
            .await;

        let client = build_http_client("test", Duration::from_secs(5)).unwrap();
        let observer = RecordingObserver::new();
        let body = fetch_page(
            &client,
            &open_gate(),
            &fast_policy(),
            &observer,
            &format!("{}/flaky", server.uri()),
        )
        .await
        .unwrap();

        assert_eq!(body, "recovered");
        assert_eq!(observer.events().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_403_is_terminal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/secret"))
            .respond_with(ResponseTemplate::new(403))
            .expect(1)
            .mount(&server)
            .await;

        let client = build_http_client("test", Duration::from_secs(5)).unwrap();
        let observer = RecordingObserver::new();
        let err = fetch_page(
            &client,
            &open_gate(),
            &fast_policy(),
            &observer,
            &format!("{}/secret", server.uri()),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, FetchError::NotFound { status: 403 }));
    }
}
