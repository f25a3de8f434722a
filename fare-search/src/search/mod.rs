//! Multi-stage itinerary search.
//!
//! This module implements the search pipeline that answers:
//! "What are the cheapest ways to fly this round trip, directly or by
//! stitching two round trips together at an intermediate city?"
//!
//! A search is a tree of stage tasks. Each task issues one page query,
//! keeps the first K candidates and either expands into child tasks or,
//! at a terminal stage, combines the accumulated fragments into route
//! results.

mod collector;
mod combine;
mod config;
mod orchestrator;
mod query;
mod runner;
mod stage;

pub use collector::ResultsCollector;
pub use combine::{combine, combine_alternative};
pub use config::SearchConfig;
pub use orchestrator::{Handled, SearchOrchestrator, StageError, StageOutcome, TaskScheduler};
pub use query::{QueryKind, SearchQuery};
pub use runner::{PageFetcher, RunSummary, SearchRunner};
pub use stage::{Stage, StageTask};
