//! Staged state machine driving a search branch.
//!
//! For each completed fetch the orchestrator prunes the extracted candidates
//! to the first K, then either expands the task into child tasks carrying
//! the accumulated fragments, or, at a terminal stage, combines fragments
//! into route results and hands them to the collector.
//!
//! Candidates are taken in the order the site returned them; the site sorts
//! by price, so the first K are the cheapest.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, trace};

use crate::domain::{DomainError, FlightItinerary, RouteResult};

use super::collector::ResultsCollector;
use super::combine::{combine, combine_alternative};
use super::stage::{Stage, StageTask};

/// Error from a single stage task. Never fatal to the run.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StageError {
    /// No usable candidates: empty extraction or failed fetch
    #[error("missing itinerary data at {stage}: {reason}")]
    MissingData { stage: Stage, reason: String },

    /// Fetch collaborator did not answer within its deadline
    #[error("fetch at {stage} timed out after {after:?}")]
    FetchTimeout { stage: Stage, after: Duration },

    /// The four-leg merge found no arrival in the via city
    #[error("cannot splice alternative route at {stage}: {source}")]
    SpliceNotFound {
        stage: Stage,
        #[source]
        source: DomainError,
    },

    /// Fragments could not be combined into a valid itinerary
    #[error("cannot combine itineraries at {stage}: {source}")]
    InvalidItinerary {
        stage: Stage,
        #[source]
        source: DomainError,
    },
}

impl StageError {
    fn combining(stage: Stage, source: DomainError) -> Self {
        match source {
            DomainError::SpliceNotFound(_) => StageError::SpliceNotFound { stage, source },
            source => StageError::InvalidItinerary { stage, source },
        }
    }

    /// Returns the stage the error occurred at.
    pub fn stage(&self) -> Stage {
        match self {
            StageError::MissingData { stage, .. }
            | StageError::FetchTimeout { stage, .. }
            | StageError::SpliceNotFound { stage, .. }
            | StageError::InvalidItinerary { stage, .. } => *stage,
        }
    }

    /// Returns true if re-running the task could succeed.
    ///
    /// Combination failures are a property of the fragments, so retrying
    /// cannot fix them.
    pub fn is_retriable(&self) -> bool {
        !matches!(
            self,
            StageError::SpliceNotFound { .. } | StageError::InvalidItinerary { .. }
        )
    }
}

/// What processing a task produced.
#[derive(Debug, Clone)]
pub enum StageOutcome {
    /// Child tasks for the next stage
    Expand(Vec<StageTask>),
    /// Final results of a terminal stage
    Complete(Vec<RouteResult>),
}

/// Accepts child tasks emitted by the orchestrator.
pub trait TaskScheduler {
    /// Queue tasks for later execution.
    fn enqueue(&mut self, tasks: Vec<StageTask>);
}

impl TaskScheduler for Vec<StageTask> {
    fn enqueue(&mut self, tasks: Vec<StageTask>) {
        self.extend(tasks);
    }
}

/// Summary of one handled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// This many child tasks were scheduled
    Enqueued(usize),
    /// This many results were collected
    Collected(usize),
}

/// Stage state machine for one search run.
#[derive(Debug, Clone)]
pub struct SearchOrchestrator {
    top_k: usize,
    collector: Arc<ResultsCollector>,
}

impl SearchOrchestrator {
    /// Create an orchestrator pruning to `top_k` (at least one) and
    /// collecting into `collector`.
    pub fn new(top_k: usize, collector: Arc<ResultsCollector>) -> Self {
        Self {
            top_k: top_k.max(1),
            collector,
        }
    }

    /// Returns the pruning width.
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Process a task's candidates, scheduling children or collecting results.
    pub fn handle<S: TaskScheduler>(
        &self,
        task: &StageTask,
        candidates: Vec<FlightItinerary>,
        scheduler: &mut S,
    ) -> Result<Handled, StageError> {
        match self.advance(task, candidates)? {
            StageOutcome::Expand(children) => {
                let count = children.len();
                scheduler.enqueue(children);
                Ok(Handled::Enqueued(count))
            }
            StageOutcome::Complete(results) => {
                let count = results.len();
                let total = self.collector.append(results);
                debug!(stage = %task.stage(), count, total, "collected route results");
                Ok(Handled::Collected(count))
            }
        }
    }

    /// Compute the outcome of a task without side effects.
    ///
    /// # Errors
    ///
    /// [`StageError::MissingData`] if `candidates` is empty,
    /// [`StageError::SpliceNotFound`] if a four-leg merge fails,
    /// [`StageError::InvalidItinerary`] if combined fragments are out of range.
    pub fn advance(
        &self,
        task: &StageTask,
        candidates: Vec<FlightItinerary>,
    ) -> Result<StageOutcome, StageError> {
        let stage = task.stage();
        if candidates.is_empty() {
            return Err(StageError::MissingData {
                stage,
                reason: "no candidates extracted".to_string(),
            });
        }
        trace!(%stage, candidates = candidates.len(), top_k = self.top_k, "advancing task");

        let top = candidates.into_iter().take(self.top_k);

        let outcome = match task {
            StageTask::Outbound { search } => StageOutcome::Expand(
                top.map(|outbound| StageTask::Inbound {
                    search: search.clone(),
                    outbound,
                })
                .collect(),
            ),

            StageTask::Inbound { search, outbound } => StageOutcome::Complete(
                top.map(|inbound| {
                    combine(outbound, &inbound).map(|trip| RouteResult::direct(search, trip))
                })
                .collect::<Result<Vec<_>, _>>()
                .map_err(|source| StageError::combining(stage, source))?,
            ),

            StageTask::Leg1Outbound { route } => StageOutcome::Expand(
                top.map(|outbound| StageTask::Leg1Inbound {
                    route: route.clone(),
                    outbound,
                })
                .collect(),
            ),

            // Only the single best inbound continues, keeping the pattern at K^3
            StageTask::Leg1Inbound { route, outbound } => {
                let mut top = top;
                let best = top.next().ok_or_else(|| StageError::MissingData {
                    stage,
                    reason: "no candidates extracted".to_string(),
                })?;
                let leg1 = combine(outbound, &best)
                    .map_err(|source| StageError::combining(stage, source))?;
                StageOutcome::Expand(vec![StageTask::Leg2Outbound {
                    route: route.clone(),
                    leg1,
                }])
            }

            StageTask::Leg2Outbound { route, leg1 } => StageOutcome::Expand(
                top.map(|outbound| StageTask::Leg2Inbound {
                    route: route.clone(),
                    leg1: leg1.clone(),
                    outbound,
                })
                .collect(),
            ),

            StageTask::Leg2Inbound {
                route,
                leg1,
                outbound,
            } => {
                let results = top
                    .map(|inbound| {
                        combine(outbound, &inbound)
                            .and_then(|leg2| combine_alternative(leg1, &leg2))
                            .map(|full| RouteResult::alternative(route, full))
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|source| StageError::combining(stage, source))?;
                StageOutcome::Complete(results)
            }
        };

        Ok(outcome)
    }
}
