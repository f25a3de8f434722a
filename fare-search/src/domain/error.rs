//! Domain error types.
//!
//! These errors represent validation failures and data inconsistencies
//! in the domain layer. They are distinct from fetch/IO errors.

use chrono::NaiveDate;

use super::IataCode;

/// Domain-level errors for validation and itinerary combination.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// Itinerary has no legs
    #[error("itinerary must have at least one leg")]
    EmptyItinerary,

    /// Inbound date precedes the outbound date
    #[error("inbound date {inbound} is before outbound date {outbound}")]
    InvalidDates {
        outbound: NaiveDate,
        inbound: NaiveDate,
    },

    /// No leg of the first round trip arrives at the intermediate city
    #[error("no leg arrives at intermediate city {0}")]
    SpliceNotFound(IataCode),

    /// Combined travel time does not fit in a duration
    #[error("combined itinerary duration overflows")]
    DurationOverflow,
}
