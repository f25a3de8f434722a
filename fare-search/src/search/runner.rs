//! Task driver for a search run.
//!
//! Owns the work queue: dispatches stage tasks to the fetch collaborator
//! with bounded concurrency and a per-fetch deadline, feeds extracted
//! candidates to the orchestrator, retries failed tasks, and gates new
//! top-level searches on the result limit.
//!
//! Child tasks are always dispatched before new top-level tasks, so
//! started branches drain first and the limit gate sees their results.

use std::collections::VecDeque;
use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::domain::FlightItinerary;
use crate::trip::{FetchError, extract_itineraries};

use super::collector::ResultsCollector;
use super::config::SearchConfig;
use super::orchestrator::{SearchOrchestrator, StageError, TaskScheduler};
use super::query::SearchQuery;
use super::stage::StageTask;

/// Trait for resolving search queries into raw payloads.
///
/// This abstraction allows the runner to be tested with mock data.
pub trait PageFetcher {
    /// Fetch the raw search payload for `query`.
    async fn fetch(&self, query: &SearchQuery) -> Result<Value, FetchError>;
}

/// Counters describing a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    /// Fetches issued, including retries.
    pub requests: usize,
    /// Tasks that expanded or produced results.
    pub tasks_completed: usize,
    /// Tasks dropped after failing.
    pub tasks_failed: usize,
    /// Retry attempts scheduled.
    pub tasks_retried: usize,
    /// Top-level tasks never started because the result limit was reached.
    pub roots_skipped: usize,
    /// Tasks never started because the request budget ran out.
    pub tasks_abandoned: usize,
    /// Results collected.
    pub results: usize,
}

/// A task with its attempt number (0 for the first run).
#[derive(Debug)]
struct QueuedTask {
    task: StageTask,
    attempt: u32,
}

impl QueuedTask {
    fn new(task: StageTask) -> Self {
        Self { task, attempt: 0 }
    }
}

/// Pending work, split so children are preferred over new roots.
#[derive(Debug, Default)]
struct TaskQueue {
    roots: VecDeque<QueuedTask>,
    children: VecDeque<QueuedTask>,
}

impl TaskQueue {
    fn with_roots(roots: Vec<StageTask>) -> Self {
        Self {
            roots: roots.into_iter().map(QueuedTask::new).collect(),
            children: VecDeque::new(),
        }
    }

    fn retry(&mut self, queued: QueuedTask) {
        self.children.push_back(QueuedTask {
            task: queued.task,
            attempt: queued.attempt + 1,
        });
    }

    fn len(&self) -> usize {
        self.roots.len() + self.children.len()
    }

    fn is_empty(&self) -> bool {
        self.roots.is_empty() && self.children.is_empty()
    }
}

impl TaskScheduler for TaskQueue {
    fn enqueue(&mut self, tasks: Vec<StageTask>) {
        self.children.extend(tasks.into_iter().map(QueuedTask::new));
    }
}

/// Drives stage tasks to completion against a page fetcher.
pub struct SearchRunner<'a, P: PageFetcher> {
    fetcher: &'a P,
    config: &'a SearchConfig,
    collector: Arc<ResultsCollector>,
}

impl<'a, P: PageFetcher> SearchRunner<'a, P> {
    /// Create a new runner collecting into `collector`.
    pub fn new(fetcher: &'a P, config: &'a SearchConfig, collector: Arc<ResultsCollector>) -> Self {
        Self {
            fetcher,
            config,
            collector,
        }
    }

    /// Run every branch rooted at `roots` until no work remains.
    ///
    /// Failures are scoped to the task that produced them; the run itself
    /// never fails. Results accumulate in the collector.
    pub async fn run(&self, roots: Vec<StageTask>) -> RunSummary {
        let orchestrator = SearchOrchestrator::new(self.config.top_k, self.collector.clone());
        let concurrency = self.config.concurrency.max(1);
        let mut queue = TaskQueue::with_roots(roots);
        let mut in_flight = FuturesUnordered::new();
        let mut summary = RunSummary::default();

        info!(
            roots = queue.len(),
            top_k = orchestrator.top_k(),
            concurrency,
            "starting search run"
        );

        loop {
            while in_flight.len() < concurrency {
                if summary.requests >= self.config.max_requests {
                    break;
                }
                let Some(queued) = self.next_task(&mut queue, &mut summary) else {
                    break;
                };
                summary.requests += 1;
                in_flight.push(self.fetch_candidates(queued));
            }

            let Some((queued, fetched)) = in_flight.next().await else {
                break;
            };

            let stage = queued.task.stage();
            let outcome = fetched
                .and_then(|candidates| orchestrator.handle(&queued.task, candidates, &mut queue));
            match outcome {
                Ok(handled) => {
                    debug!(%stage, ?handled, "task completed");
                    summary.tasks_completed += 1;
                }
                Err(e) if e.is_retriable() && queued.attempt < self.config.max_retries => {
                    warn!(%stage, attempt = queued.attempt + 1, error = %e, "task failed, retrying");
                    summary.tasks_retried += 1;
                    queue.retry(queued);
                }
                Err(e) => {
                    warn!(%stage, attempts = queued.attempt + 1, error = %e, "task failed, dropping branch");
                    summary.tasks_failed += 1;
                }
            }
        }

        // Roots cut by the result limit are counted in next_task and cleared
        if summary.requests >= self.config.max_requests && !queue.is_empty() {
            summary.tasks_abandoned = queue.len();
            warn!(
                max_requests = self.config.max_requests,
                abandoned = summary.tasks_abandoned,
                "request budget exhausted"
            );
        }

        summary.results = self.collector.len();
        info!(
            requests = summary.requests,
            completed = summary.tasks_completed,
            failed = summary.tasks_failed,
            results = summary.results,
            "search run finished"
        );
        summary
    }

    /// Next task to dispatch: children first, then roots while under the
    /// result limit.
    fn next_task(&self, queue: &mut TaskQueue, summary: &mut RunSummary) -> Option<QueuedTask> {
        if let Some(child) = queue.children.pop_front() {
            return Some(child);
        }

        let root = queue.roots.pop_front()?;
        let limit_reached = self
            .config
            .max_results
            .is_some_and(|max| self.collector.is_limit_reached(max));
        if limit_reached {
            summary.roots_skipped += 1 + queue.roots.len();
            info!(
                max_results = ?self.config.max_results,
                skipped = summary.roots_skipped,
                "result limit reached, skipping remaining searches"
            );
            queue.roots.clear();
            return None;
        }
        Some(root)
    }

    /// Fetch and extract the candidates for one task.
    ///
    /// Extraction failures count as zero candidates.
    async fn fetch_candidates(
        &self,
        queued: QueuedTask,
    ) -> (QueuedTask, Result<Vec<FlightItinerary>, StageError>) {
        let stage = queued.task.stage();
        let query = queued.task.query();
        let deadline = self.config.fetch_timeout();

        let result = match tokio::time::timeout(deadline, self.fetcher.fetch(&query)).await {
            Err(_) | Ok(Err(FetchError::Timeout)) => Err(StageError::FetchTimeout {
                stage,
                after: deadline,
            }),
            Ok(Err(e)) => Err(StageError::MissingData {
                stage,
                reason: format!("fetch failed: {e}"),
            }),
            Ok(Ok(payload)) => Ok(self.candidates(&queued.task, &payload)),
        };

        (queued, result)
    }

    fn candidates(&self, task: &StageTask, payload: &Value) -> Vec<FlightItinerary> {
        let mut candidates = match extract_itineraries(payload) {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(stage = %task.stage(), error = %e, "failed to extract itineraries");
                return Vec::new();
            }
        };

        let airlines = &task.search().airlines;
        if !airlines.is_empty() {
            let before = candidates.len();
            candidates.retain(|c| c.is_operated_by(airlines));
            debug!(
                stage = %task.stage(),
                kept = candidates.len(),
                dropped = before - candidates.len(),
                "applied airline filter"
            );
        }
        candidates
    }
}
