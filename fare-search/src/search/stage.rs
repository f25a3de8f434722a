//! Stage tasks: the unit of pipeline work.
//!
//! Each variant of [`StageTask`] carries exactly the fragments its stage
//! needs, so a task can never reach a stage without the itineraries that
//! stage combines.
//!
//! ```text
//! Direct:       OUTBOUND -> INBOUND*
//! Alternative:  LEG1_OUTBOUND -> LEG1_INBOUND -> LEG2_OUTBOUND -> LEG2_INBOUND*
//! ```

use std::fmt;
use std::sync::Arc;

use crate::domain::{FlightItinerary, RoutePattern, SearchContext, ViaContext};

use super::query::SearchQuery;

/// Stage tag of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Outbound,
    Inbound,
    Leg1Outbound,
    Leg1Inbound,
    Leg2Outbound,
    Leg2Inbound,
}

impl Stage {
    /// Returns true for the stages that produce route results.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Inbound | Stage::Leg2Inbound)
    }

    /// Returns true for the stages a top-level search starts at.
    pub fn is_root(&self) -> bool {
        matches!(self, Stage::Outbound | Stage::Leg1Outbound)
    }

    /// Returns the pattern this stage belongs to.
    pub fn pattern(&self) -> RoutePattern {
        match self {
            Stage::Outbound | Stage::Inbound => RoutePattern::Direct,
            _ => RoutePattern::Alternative,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Outbound => "OUTBOUND",
            Stage::Inbound => "INBOUND",
            Stage::Leg1Outbound => "LEG1_OUTBOUND",
            Stage::Leg1Inbound => "LEG1_INBOUND",
            Stage::Leg2Outbound => "LEG2_OUTBOUND",
            Stage::Leg2Inbound => "LEG2_INBOUND",
        };
        f.write_str(name)
    }
}

/// A unit of pipeline work together with the fragments accumulated so far.
#[derive(Debug, Clone)]
pub enum StageTask {
    /// Search outbound offers origin -> destination.
    Outbound { search: Arc<SearchContext> },

    /// Search inbound offers for a chosen outbound offer.
    Inbound {
        search: Arc<SearchContext>,
        outbound: FlightItinerary,
    },

    /// Search outbound offers origin -> via.
    Leg1Outbound { route: Arc<ViaContext> },

    /// Search inbound offers via -> origin for a chosen leg-1 outbound.
    Leg1Inbound {
        route: Arc<ViaContext>,
        outbound: FlightItinerary,
    },

    /// Search outbound offers via -> destination, carrying the leg-1 round trip.
    Leg2Outbound {
        route: Arc<ViaContext>,
        leg1: FlightItinerary,
    },

    /// Search inbound offers destination -> via for a chosen leg-2 outbound.
    Leg2Inbound {
        route: Arc<ViaContext>,
        leg1: FlightItinerary,
        outbound: FlightItinerary,
    },
}

impl StageTask {
    /// Root task of a direct search.
    pub fn direct(search: SearchContext) -> Self {
        StageTask::Outbound {
            search: Arc::new(search),
        }
    }

    /// Root task of an alternative search through `route.via`.
    pub fn alternative(route: ViaContext) -> Self {
        StageTask::Leg1Outbound {
            route: Arc::new(route),
        }
    }

    /// Returns the stage tag.
    pub fn stage(&self) -> Stage {
        match self {
            StageTask::Outbound { .. } => Stage::Outbound,
            StageTask::Inbound { .. } => Stage::Inbound,
            StageTask::Leg1Outbound { .. } => Stage::Leg1Outbound,
            StageTask::Leg1Inbound { .. } => Stage::Leg1Inbound,
            StageTask::Leg2Outbound { .. } => Stage::Leg2Outbound,
            StageTask::Leg2Inbound { .. } => Stage::Leg2Inbound,
        }
    }

    /// Returns the end-to-end search parameters.
    pub fn search(&self) -> &SearchContext {
        match self {
            StageTask::Outbound { search } | StageTask::Inbound { search, .. } => search,
            StageTask::Leg1Outbound { route }
            | StageTask::Leg1Inbound { route, .. }
            | StageTask::Leg2Outbound { route, .. }
            | StageTask::Leg2Inbound { route, .. } => &route.search,
        }
    }

    /// Builds the query this task's fetch resolves.
    ///
    /// Leg 1 is the origin <-> via round trip, leg 2 the via <-> destination
    /// round trip. Inbound stages reuse their outbound's city pair and carry
    /// the outbound offer ids.
    pub fn query(&self) -> SearchQuery {
        match self {
            StageTask::Outbound { search } => {
                SearchQuery::first(search.origin, search.destination, search)
            }
            StageTask::Inbound { search, outbound } => {
                SearchQuery::next(search.origin, search.destination, search, outbound.offer())
            }
            StageTask::Leg1Outbound { route } => {
                SearchQuery::first(route.search.origin, route.via, &route.search)
            }
            StageTask::Leg1Inbound { route, outbound } => SearchQuery::next(
                route.search.origin,
                route.via,
                &route.search,
                outbound.offer(),
            ),
            StageTask::Leg2Outbound { route, .. } => {
                SearchQuery::first(route.via, route.search.destination, &route.search)
            }
            StageTask::Leg2Inbound { route, outbound, .. } => SearchQuery::next(
                route.via,
                route.search.destination,
                &route.search,
                outbound.offer(),
            ),
        }
    }
}
