//! Data transfer objects for web requests and responses.

use serde::Serialize;

use crate::domain::RouteResult;
use crate::search::RunSummary;
use crate::sink::RouteRecord;

/// Response for a search run.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// Route results, cheapest first
    pub results: Vec<RouteRecord>,

    /// Counters for the run
    pub summary: RunSummary,
}

impl SearchResponse {
    /// Build from the sorted results of a run.
    pub fn new(results: &[RouteResult], summary: RunSummary) -> Self {
        Self {
            results: results.iter().map(RouteRecord::from).collect(),
            summary,
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
