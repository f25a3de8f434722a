//! Trip.com search HTTP client.
//!
//! Resolves search queries into the raw search payload streamed by the
//! site. Uses a semaphore to limit concurrent requests and avoid being
//! throttled.

use std::sync::Arc;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde_json::Value;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::search::{PageFetcher, SearchQuery};

use super::error::FetchError;
use super::sse::last_data_event;
use super::url::query_url;

/// Default base URL for the site's flight pages.
const DEFAULT_BASE_URL: &str = "https://tw.trip.com/flights";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 3;

/// Configuration for the site client.
#[derive(Debug, Clone)]
pub struct TripConfig {
    /// Base URL of the flight pages
    pub base_url: String,
    /// Locale sent with follow-up searches
    pub locale: String,
    /// Currency sent with follow-up searches
    pub currency: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl TripConfig {
    /// Create a config with production defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set locale and currency.
    pub fn with_locale(mut self, locale: impl Into<String>, currency: impl Into<String>) -> Self {
        self.locale = locale.into();
        self.currency = currency.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for TripConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            locale: "zh-TW".to_string(),
            currency: "TWD".to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 60,
        }
    }
}

/// Site search client.
#[derive(Debug, Clone)]
pub struct TripClient {
    http: reqwest::Client,
    config: TripConfig,
    semaphore: Arc<Semaphore>,
}

impl TripClient {
    /// Create a new client with the given configuration.
    pub fn new(config: TripConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("text/event-stream, */*"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
            config,
        })
    }

    /// Fetch the raw search payload for `query`.
    ///
    /// The body is read as a server-sent event stream and the last data
    /// event is returned.
    pub async fn search(&self, query: &SearchQuery) -> Result<Value, FetchError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| FetchError::Status {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = query_url(&self.config, query)?;
        debug!(%query, %url, "fetching search page");

        let response = self.http.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let body = response.text().await?;
        last_data_event(&body).ok_or(FetchError::NoData)
    }
}

impl PageFetcher for TripClient {
    async fn fetch(&self, query: &SearchQuery) -> Result<Value, FetchError> {
        self.search(query).await
    }
}
