//! Search configuration for the stage pipeline.

use std::time::Duration;

/// Configuration parameters for a search run.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Number of cheapest candidates expanded at each non-terminal stage
    /// and collected at each terminal stage.
    pub top_k: usize,

    /// Stop starting new top-level searches once this many results exist.
    /// `None` means unlimited. Tasks already in flight still finish.
    pub max_results: Option<usize>,

    /// Maximum number of stage tasks in flight at once.
    pub concurrency: usize,

    /// Deadline for a single fetch (seconds).
    pub fetch_timeout_secs: u64,

    /// Maximum number of fetches over the whole run.
    pub max_requests: usize,

    /// How many times a failed stage task is retried before it is dropped.
    pub max_retries: u32,
}

impl SearchConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        top_k: usize,
        max_results: Option<usize>,
        concurrency: usize,
        fetch_timeout_secs: u64,
        max_requests: usize,
        max_retries: u32,
    ) -> Self {
        Self {
            top_k,
            max_results,
            concurrency,
            fetch_timeout_secs,
            max_requests,
            max_retries,
        }
    }

    /// Returns the per-fetch deadline as a Duration.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            top_k: 10,
            max_results: None,
            concurrency: 3,
            fetch_timeout_secs: 60,
            max_requests: 1000,
            max_retries: 3,
        }
    }
}
