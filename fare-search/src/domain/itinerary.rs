//! Priced itinerary types.
//!
//! A `FlightItinerary` is an ordered list of legs together with the price
//! and the identifiers the site uses to reference the offer in a follow-up
//! search.

use chrono::Duration;

use super::{DomainError, FlightLeg, IataCode};

/// Separator used when two offers are folded into one composite itinerary.
pub const OFFER_ID_SEPARATOR: &str = "|";

/// Opaque identifiers of a priced offer on the site.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OfferRef {
    /// Search-level token (`criteriaToken` in follow-up queries)
    pub product_id: String,
    /// Offer-level token (`shoppingid`/`groupKey` in follow-up queries)
    pub policy_id: String,
}

impl OfferRef {
    /// Create a new offer reference.
    pub fn new(product_id: impl Into<String>, policy_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            policy_id: policy_id.into(),
        }
    }

    /// Concatenate two references, keeping both traceable.
    ///
    /// ```
    /// use fare_search::domain::OfferRef;
    ///
    /// let a = OfferRef::new("p1", "q1");
    /// let b = OfferRef::new("p2", "q2");
    /// let joined = a.joined(&b);
    /// assert_eq!(joined.product_id, "p1|p2");
    /// assert_eq!(joined.policy_id, "q1|q2");
    /// ```
    pub fn joined(&self, other: &OfferRef) -> OfferRef {
        OfferRef {
            product_id: format!(
                "{}{OFFER_ID_SEPARATOR}{}",
                self.product_id, other.product_id
            ),
            policy_id: format!("{}{OFFER_ID_SEPARATOR}{}", self.policy_id, other.policy_id),
        }
    }
}

/// A priced itinerary: one or more legs sold as a single offer.
///
/// # Invariants
///
/// - At least one leg
/// - `leg_count() == legs().len()` (the count is derived, never stored)
///
/// Legs are chronological. Within one direction of travel consecutive legs
/// chain (arrival city of one leg is the departure city of the next); a
/// composite round trip has a break where the return starts.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightItinerary {
    legs: Vec<FlightLeg>,
    total_price: f64,
    total_duration: Duration,
    origin: IataCode,
    destination: IataCode,
    offer: OfferRef,
}

impl FlightItinerary {
    /// Build an itinerary from extracted legs.
    ///
    /// Origin and destination are the first leg's departure city and the last
    /// leg's arrival city. `total_duration` is taken as reported, not derived
    /// from the legs.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyItinerary`] if `legs` is empty.
    pub fn new(
        legs: Vec<FlightLeg>,
        total_price: f64,
        total_duration: Duration,
        offer: OfferRef,
    ) -> Result<Self, DomainError> {
        let (Some(first), Some(last)) = (legs.first(), legs.last()) else {
            return Err(DomainError::EmptyItinerary);
        };
        let origin = first.departure_city;
        let destination = last.arrival_city;

        Ok(Self {
            legs,
            total_price,
            total_duration,
            origin,
            destination,
            offer,
        })
    }

    /// Assemble a composite itinerary with explicit endpoints.
    ///
    /// Used by the combiner, whose endpoints are not the first/last leg cities.
    pub(crate) fn from_parts(
        legs: Vec<FlightLeg>,
        total_price: f64,
        total_duration: Duration,
        origin: IataCode,
        destination: IataCode,
        offer: OfferRef,
    ) -> Self {
        Self {
            legs,
            total_price,
            total_duration,
            origin,
            destination,
            offer,
        }
    }

    /// Returns the legs in travel order.
    pub fn legs(&self) -> &[FlightLeg] {
        &self.legs
    }

    /// Returns the number of legs.
    pub fn leg_count(&self) -> usize {
        self.legs.len()
    }

    /// Returns the offer price.
    pub fn total_price(&self) -> f64 {
        self.total_price
    }

    /// Returns the total travel duration.
    pub fn total_duration(&self) -> Duration {
        self.total_duration
    }

    /// Returns the origin city.
    pub fn origin(&self) -> IataCode {
        self.origin
    }

    /// Returns the destination city.
    pub fn destination(&self) -> IataCode {
        self.destination
    }

    /// Returns the offer identifiers.
    pub fn offer(&self) -> &OfferRef {
        &self.offer
    }

    /// Returns the search-level product id.
    pub fn product_id(&self) -> &str {
        &self.offer.product_id
    }

    /// Returns the offer-level policy id.
    pub fn policy_id(&self) -> &str {
        &self.offer.policy_id
    }

    /// Index of the first leg arriving in `city`, if any.
    pub fn first_arrival_in(&self, city: IataCode) -> Option<usize> {
        self.legs.iter().position(|leg| leg.arrival_city == city)
    }

    /// Returns true if every leg is flown by one of `carriers`.
    ///
    /// An empty carrier list matches everything.
    pub fn is_operated_by(&self, carriers: &[String]) -> bool {
        carriers.is_empty() || self.legs.iter().all(|leg| leg.is_operated_by_any(carriers))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::domain::leg::fixtures::leg;

    /// An itinerary following `cities` (e.g. `["TPE", "HKG", "NRT"]`), one leg
    /// per hop, each leg 180 minutes.
    pub fn itinerary(cities: &[&str], price: f64, policy_id: &str) -> FlightItinerary {
        let legs: Vec<FlightLeg> = cities
            .windows(2)
            .enumerate()
            .map(|(i, hop)| leg(hop[0], hop[1], &format!("BR{}", 100 + i)))
            .collect();
        let minutes = 180 * legs.len() as i64;
        FlightItinerary::new(
            legs,
            price,
            Duration::minutes(minutes),
            OfferRef::new("product", policy_id),
        )
        .unwrap()
    }
}
