//! Mock fetcher for running searches without site access.
//!
//! Serves recorded search payloads. First-page queries are looked up by
//! route (`TPE-PRG`), follow-up queries by the policy id of the outbound
//! offer they were issued for.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::IataCode;
use crate::search::{PageFetcher, QueryKind, SearchQuery};

use super::error::FetchError;
use super::sse::last_data_event;

/// Mock fetcher that serves payloads from memory or from files.
#[derive(Clone, Default)]
pub struct MockFetcher {
    /// Recorded payloads, keyed by route or policy id.
    payloads: Arc<RwLock<HashMap<String, Value>>>,
    calls: Arc<AtomicUsize>,
}

impl MockFetcher {
    /// Create an empty mock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load payloads from a directory.
    ///
    /// Expects files named `{FROM}-{TO}.json` for first-page searches and
    /// `{policyId}.json` for follow-up searches. Files ending in `.sse` hold
    /// a raw event stream and are decoded like a live response.
    pub fn from_dir(data_dir: impl AsRef<Path>) -> Result<Self, FetchError> {
        let payloads = load_dir(data_dir.as_ref())?;
        Ok(Self {
            payloads: Arc::new(RwLock::new(payloads)),
            calls: Arc::default(),
        })
    }

    /// Serve `payload` for first-page searches from `from` to `to`.
    pub fn with_route(self, from: &str, to: &str, payload: Value) -> Self {
        self.insert(format!("{from}-{to}"), payload)
    }

    /// Serve `payload` for follow-up searches on the offer `policy_id`.
    pub fn with_offer(self, policy_id: &str, payload: Value) -> Self {
        self.insert(policy_id.to_string(), payload)
    }

    fn insert(self, key: String, payload: Value) -> Self {
        // Builder use happens before the mock is shared, so the lock is free
        if let Ok(mut payloads) = self.payloads.try_write() {
            payloads.insert(key, payload);
        }
        self
    }

    /// Number of fetches served or refused so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    /// Lookup key for a query.
    pub fn key_for(query: &SearchQuery) -> String {
        match &query.kind {
            QueryKind::First => route_key(query.from, query.to),
            QueryKind::Next(offer) => offer.policy_id.clone(),
        }
    }

    /// Reload payloads from disk (useful for development).
    pub async fn reload(&self, data_dir: impl AsRef<Path>) -> Result<(), FetchError> {
        let fresh = load_dir(data_dir.as_ref())?;
        *self.payloads.write().await = fresh;
        Ok(())
    }
}

impl PageFetcher for MockFetcher {
    async fn fetch(&self, query: &SearchQuery) -> Result<Value, FetchError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let key = Self::key_for(query);
        debug!(%query, key = %key, "serving recorded payload");

        let payloads = self.payloads.read().await;
        payloads.get(&key).cloned().ok_or(FetchError::NotFound(key))
    }
}

fn route_key(from: IataCode, to: IataCode) -> String {
    format!("{from}-{to}")
}

fn load_dir(data_dir: &Path) -> Result<HashMap<String, Value>, FetchError> {
    let mut payloads = HashMap::new();

    let entries = std::fs::read_dir(data_dir).map_err(|e| {
        FetchError::Io(format!("failed to read mock data directory {data_dir:?}: {e}"))
    })?;

    for entry in entries {
        let entry =
            entry.map_err(|e| FetchError::Io(format!("failed to read directory entry: {e}")))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let extension = path.extension().and_then(|s| s.to_str());
        if !matches!(extension, Some("json" | "sse")) {
            continue;
        }

        let key = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| FetchError::Io(format!("invalid filename: {path:?}")))?
            .to_string();

        let text = std::fs::read_to_string(&path)
            .map_err(|e| FetchError::Io(format!("failed to read {path:?}: {e}")))?;

        let payload = if extension == Some("sse") {
            last_data_event(&text).ok_or(FetchError::NoData)?
        } else {
            serde_json::from_str(&text).map_err(|e| FetchError::Json {
                message: format!("{path:?}: {e}"),
                body: None,
            })?
        };

        payloads.insert(key, payload);
    }

    if payloads.is_empty() {
        return Err(FetchError::Io(format!(
            "no mock payload files found in {data_dir:?}"
        )));
    }

    Ok(payloads)
}
