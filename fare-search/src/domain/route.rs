//! Final search results.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{FlightItinerary, IataCode, SearchContext, TravelDates, ViaContext};

/// How a route result was assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoutePattern {
    /// Round trip between origin and destination
    Direct,
    /// Two round trips spliced at an intermediate city
    Alternative,
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutePattern::Direct => f.write_str("DIRECT"),
            RoutePattern::Alternative => f.write_str("ALTERNATIVE"),
        }
    }
}

/// A finished, priced route. Created once at a terminal stage.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResult {
    pattern: RoutePattern,
    itinerary: FlightItinerary,
    via: Option<IataCode>,
    dates: TravelDates,
}

impl RouteResult {
    /// A direct-pattern result.
    pub fn direct(context: &SearchContext, itinerary: FlightItinerary) -> Self {
        Self {
            pattern: RoutePattern::Direct,
            itinerary,
            via: None,
            dates: context.dates,
        }
    }

    /// An alternative-pattern result through `context.via`.
    pub fn alternative(context: &ViaContext, itinerary: FlightItinerary) -> Self {
        Self {
            pattern: RoutePattern::Alternative,
            itinerary,
            via: Some(context.via),
            dates: context.search.dates,
        }
    }

    /// Returns the pattern.
    pub fn pattern(&self) -> RoutePattern {
        self.pattern
    }

    /// Returns the composite itinerary.
    pub fn itinerary(&self) -> &FlightItinerary {
        &self.itinerary
    }

    /// Returns the departure city.
    pub fn origin(&self) -> IataCode {
        self.itinerary.origin()
    }

    /// Returns the intermediate city, for alternative routes.
    pub fn via(&self) -> Option<IataCode> {
        self.via
    }

    /// Returns the destination city.
    pub fn destination(&self) -> IataCode {
        self.itinerary.destination()
    }

    /// Returns the searched travel dates.
    pub fn dates(&self) -> TravelDates {
        self.dates
    }

    /// Returns the price used for ranking.
    pub fn total_price(&self) -> f64 {
        self.itinerary.total_price()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CabinClass;
    use crate::domain::itinerary::fixtures::itinerary;
    use chrono::NaiveDate;

    fn context() -> SearchContext {
        let d = |day| NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
        SearchContext {
            origin: IataCode::parse("TPE").unwrap(),
            destination: IataCode::parse("NRT").unwrap(),
            dates: TravelDates::new(d(1), d(8)).unwrap(),
            cabin: CabinClass::Economy,
            passengers: 1,
            airlines: vec![],
        }
    }

    #[test]
    fn direct_result_has_no_via() {
        let result = RouteResult::direct(&context(), itinerary(&["TPE", "NRT"], 420.0, "a"));
        assert_eq!(result.pattern(), RoutePattern::Direct);
        assert_eq!(result.via(), None);
        assert_eq!(result.total_price(), 420.0);
        assert_eq!(result.origin().as_str(), "TPE");
        assert_eq!(result.destination().as_str(), "NRT");
    }

    #[test]
    fn alternative_result_carries_via() {
        let via = ViaContext::new(context(), IataCode::parse("HKG").unwrap());
        let result = RouteResult::alternative(&via, itinerary(&["TPE", "HKG"], 1.0, "a"));
        assert_eq!(result.pattern(), RoutePattern::Alternative);
        assert_eq!(result.via().map(|c| c.to_string()), Some("HKG".to_string()));
        assert_eq!(result.dates(), context().dates);
    }

    #[test]
    fn pattern_serializes_screaming() {
        assert_eq!(
            serde_json::to_string(&RoutePattern::Alternative).unwrap(),
            "\"ALTERNATIVE\""
        );
        assert_eq!(RoutePattern::Direct.to_string(), "DIRECT");
    }
}
