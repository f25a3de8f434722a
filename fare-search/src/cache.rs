//! Caching layer for search payloads.
//!
//! Search pages for the same route, dates and offer are identical within a
//! short window, and concurrent searches over overlapping routes issue the
//! same first-page queries repeatedly. Payloads are cached by query key;
//! failures are never cached.

use std::time::Duration;

use moka::future::Cache as MokaCache;
use serde_json::Value;
use tracing::trace;

use crate::search::{PageFetcher, SearchQuery};
use crate::trip::FetchError;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_capacity: 1000,
        }
    }
}

/// Page fetcher with caching.
///
/// Wraps any `PageFetcher` and caches successful payloads.
pub struct CachedFetcher<P> {
    inner: P,
    payloads: MokaCache<String, Value>,
}

impl<P: PageFetcher> CachedFetcher<P> {
    /// Create a new cached fetcher.
    pub fn new(inner: P, config: &CacheConfig) -> Self {
        let payloads = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, payloads }
    }

    /// Access the underlying fetcher for operations that bypass cache.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Get cache statistics.
    pub fn cache_entry_count(&self) -> u64 {
        self.payloads.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_cache(&self) {
        self.payloads.invalidate_all();
    }
}

impl<P: PageFetcher> PageFetcher for CachedFetcher<P> {
    async fn fetch(&self, query: &SearchQuery) -> Result<Value, FetchError> {
        let key = query.key();

        if let Some(cached) = self.payloads.get(&key).await {
            trace!(%query, "cache hit");
            return Ok(cached);
        }

        let payload = self.inner.fetch(query).await?;
        self.payloads.insert(key, payload.clone()).await;
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CabinClass, IataCode, OfferRef, SearchContext, TravelDates};
    use crate::trip::MockFetcher;
    use chrono::NaiveDate;
    use serde_json::json;

    fn context() -> SearchContext {
        let d = |day| NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
        SearchContext {
            origin: IataCode::parse("TPE").unwrap(),
            destination: IataCode::parse("PRG").unwrap(),
            dates: TravelDates::new(d(1), d(8)).unwrap(),
            cabin: CabinClass::Economy,
            passengers: 1,
            airlines: vec![],
        }
    }

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(300));
        assert_eq!(config.max_capacity, 1000);
    }

    #[tokio::test]
    async fn repeated_queries_hit_the_cache() {
        let mock = MockFetcher::new().with_route("TPE", "PRG", json!({ "page": 1 }));
        let cached = CachedFetcher::new(mock, &CacheConfig::default());
        let ctx = context();
        let query = SearchQuery::first(ctx.origin, ctx.destination, &ctx);

        assert_eq!(cached.fetch(&query).await.unwrap(), json!({ "page": 1 }));
        assert_eq!(cached.fetch(&query).await.unwrap(), json!({ "page": 1 }));
        assert_eq!(cached.inner().call_count(), 1);

        cached.invalidate_cache();
        cached.fetch(&query).await.unwrap();
        assert_eq!(cached.inner().call_count(), 2);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let cached = CachedFetcher::new(MockFetcher::new(), &CacheConfig::default());
        let ctx = context();
        let query = SearchQuery::next(ctx.origin, ctx.destination, &ctx, &OfferRef::new("p", "x"));

        assert!(cached.fetch(&query).await.is_err());
        assert!(cached.fetch(&query).await.is_err());
        assert_eq!(cached.inner().call_count(), 2);
    }
}
