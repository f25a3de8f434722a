//! Result persistence.
//!
//! After a run, the ranked results are handed to a [`ResultSink`]. The only
//! sink shipped here writes a pretty-printed JSON array of
//! [`RouteRecord`]s to a file.

mod record;

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::domain::RouteResult;

pub use record::{LegRecord, RouteRecord};

/// Error persisting results.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// Results could not be serialized
    #[error("failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Output could not be written
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Destination for the ranked results of a run.
pub trait ResultSink {
    /// Persist `results`, returning how many records were written.
    async fn persist(&self, results: &[RouteResult]) -> Result<usize, SinkError>;
}

/// Writes results as a JSON array to a single file.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_error(&self, source: std::io::Error) -> SinkError {
        SinkError::Write {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl ResultSink for JsonFileSink {
    /// An empty result set leaves any existing file untouched.
    async fn persist(&self, results: &[RouteResult]) -> Result<usize, SinkError> {
        if results.is_empty() {
            warn!(path = %self.path.display(), "no results to save");
            return Ok(0);
        }

        let records: Vec<RouteRecord> = results.iter().map(RouteRecord::from).collect();
        let json = serde_json::to_vec_pretty(&records)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.write_error(e))?;
        }
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| self.write_error(e))?;

        info!(path = %self.path.display(), records = records.len(), "results saved");
        Ok(records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::itinerary::fixtures::itinerary;
    use crate::domain::{CabinClass, IataCode, SearchContext, TravelDates};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn results(prices: &[f64]) -> Vec<RouteResult> {
        let d = |day| NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
        let context = SearchContext {
            origin: IataCode::parse("TPE").unwrap(),
            destination: IataCode::parse("NRT").unwrap(),
            dates: TravelDates::new(d(1), d(8)).unwrap(),
            cabin: CabinClass::Economy,
            passengers: 1,
            airlines: vec![],
        };
        prices
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                RouteResult::direct(&context, itinerary(&["TPE", "NRT", "TPE"], p, &format!("p{i}")))
            })
            .collect()
    }

    #[tokio::test]
    async fn writes_records_in_order() {
        let dir = TempDir::new().unwrap();
        let sink = JsonFileSink::new(dir.path().join("out/results.json"));

        let written = sink.persist(&results(&[100.0, 200.0])).await.unwrap();
        assert_eq!(written, 2);

        let json = std::fs::read_to_string(sink.path()).unwrap();
        let records: Vec<RouteRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].total_price, 100.0);
        assert_eq!(records[1].policy_id, "p1");
        assert!(json.contains('\n'), "expected pretty output");
    }

    #[tokio::test]
    async fn empty_results_write_nothing() {
        let dir = TempDir::new().unwrap();
        let sink = JsonFileSink::new(dir.path().join("results.json"));

        assert_eq!(sink.persist(&[]).await.unwrap(), 0);
        assert!(!sink.path().exists());
    }

    #[tokio::test]
    async fn unwritable_path_is_reported() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        let sink = JsonFileSink::new(blocker.join("results.json"));

        let err = sink.persist(&results(&[1.0])).await.unwrap_err();
        assert!(matches!(err, SinkError::Write { .. }));
    }
}
