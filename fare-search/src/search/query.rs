//! Site-independent description of one search request.

use std::fmt;

use crate::domain::{CabinClass, IataCode, OfferRef, SearchContext, TravelDates};

/// Which of the site's two search pages a query targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKind {
    /// First page of a round-trip search: lists outbound offers.
    First,
    /// Follow-up page for a chosen outbound offer: lists inbound offers.
    Next(OfferRef),
}

/// One request the fetch collaborator resolves into a raw payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchQuery {
    pub from: IataCode,
    pub to: IataCode,
    pub dates: TravelDates,
    pub cabin: CabinClass,
    pub passengers: u8,
    pub kind: QueryKind,
}

impl SearchQuery {
    /// First-page query between two cities with the context's dates and cabin.
    pub fn first(from: IataCode, to: IataCode, context: &SearchContext) -> Self {
        Self::build(from, to, context, QueryKind::First)
    }

    /// Follow-up query for the inbound offers matching `outbound`.
    pub fn next(from: IataCode, to: IataCode, context: &SearchContext, outbound: &OfferRef) -> Self {
        Self::build(from, to, context, QueryKind::Next(outbound.clone()))
    }

    fn build(from: IataCode, to: IataCode, context: &SearchContext, kind: QueryKind) -> Self {
        Self {
            from,
            to,
            dates: context.dates,
            cabin: context.cabin,
            passengers: context.passengers,
            kind,
        }
    }

    /// Stable key identifying the query, used for caching.
    pub fn key(&self) -> String {
        let base = format!(
            "{}-{}:{}:{}:{}:{}",
            self.from,
            self.to,
            self.dates.outbound(),
            self.dates.inbound(),
            self.cabin.code(),
            self.passengers
        );
        match &self.kind {
            QueryKind::First => format!("first:{base}"),
            QueryKind::Next(offer) => {
                format!("next:{base}:{}:{}", offer.product_id, offer.policy_id)
            }
        }
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            QueryKind::First => write!(f, "{}->{} (first)", self.from, self.to),
            QueryKind::Next(offer) => {
                write!(f, "{}->{} (next, policy {})", self.from, self.to, offer.policy_id)
            }
        }
    }
}
