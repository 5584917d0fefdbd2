use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use std::time::Duration;

use thiserror::Error;

/// Retry and timeout policy of the document fetcher.
///
/// The per-request timeout is deliberately short: the source answers fast
/// when it answers at all, and slow requests are better cut off and retried
/// than waited out.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub request_timeout: Duration,
    /// First backoff delay; doubled after every failed attempt.
    pub retry_initial_delay: Duration,
    /// Backoff cap.
    pub retry_max_delay: Duration,
    /// Total attempt cap; `None` retries until the request succeeds.
    pub max_attempts: Option<u32>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(1),
            retry_initial_delay: Duration::from_secs(1),
            retry_max_delay: Duration::from_secs(10),
            max_attempts: Some(8),
        }
    }
}

/// Cloneable handle on the process-wide fetch counter.
///
/// Incremented once per logical fetch (retries of the same document do not
/// count twice) and read by the orchestrator for the run summary.
#[derive(Debug, Clone, Default)]
pub struct FetchCounter(Arc<AtomicU64>);

impl FetchCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn value(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// A fetched document, addressed by its final URL (after redirects).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub url: String,
    pub html: String,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("http status {0}")]
    Status(u16),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
}

impl FetchError {
    /// Whether the retry policy applies. Client-side HTTP errors are final;
    /// timeouts, transport failures and server-side errors are transient.
    fn is_retryable(&self) -> bool {
        match self {
            FetchError::Timeout(_) | FetchError::Network(_) => true,
            FetchError::Status(code) => *code == 429 || *code >= 500,
            FetchError::InvalidUrl(_) => false,
        }
    }
}

#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

/// HTTP fetcher with bounded exponential-backoff retries.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
    settings: FetchSettings,
    counter: FetchCounter,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings, counter: FetchCounter) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::Network(err.to_string()))?;
        Ok(Self {
            client,
            settings,
            counter,
        })
    }

    async fn attempt(&self, url: reqwest::Url) -> Result<FetchedPage, FetchError> {
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let final_url = response.url().to_string();
        let html = response.text().await.map_err(map_reqwest_error)?;
        Ok(FetchedPage {
            url: final_url,
            html,
        })
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        self.counter.increment();
        let parsed =
            reqwest::Url::parse(url).map_err(|err| FetchError::InvalidUrl(err.to_string()))?;

        let mut delay = self.settings.retry_initial_delay;
        let mut attempts: u32 = 0;
        loop {
            attempts += 1;
            match self.attempt(parsed.clone()).await {
                Ok(page) => return Ok(page),
                Err(err)
                    if err.is_retryable()
                        && self.settings.max_attempts.map_or(true, |cap| attempts < cap) =>
                {
                    log::debug!("retrying {url} after attempt {attempts}: {err}");
                    tokio::time::sleep(delay).await;
                    delay = (delay * 2).min(self.settings.retry_max_delay);
                }
                Err(err) => return Err(err),
            }
        }
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout(err.to_string())
    } else {
        FetchError::Network(err.to_string())
    }
}
