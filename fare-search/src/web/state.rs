//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::CachedFetcher;
use crate::search::SearchConfig;
use crate::trip::SiteFetcher;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Cached payload source
    pub fetcher: Arc<CachedFetcher<SiteFetcher>>,

    /// Base search configuration; each request's limits apply on top
    pub config: Arc<SearchConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(fetcher: CachedFetcher<SiteFetcher>, config: SearchConfig) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            config: Arc::new(config),
        }
    }
}
