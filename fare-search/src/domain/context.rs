//! Per-search parameters.
//!
//! A `SearchContext` names one round trip to price. A `ViaContext` adds the
//! intermediate city for the alternative (four-stage) pattern. Both are
//! immutable once built and shared between stage tasks behind an `Arc`.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{DomainError, IataCode};

/// Cabin class requested from the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CabinClass {
    #[default]
    Economy,
    PremiumEconomy,
    Business,
    First,
}

impl CabinClass {
    /// Single-letter class code used in site queries (lowercase).
    pub fn code(&self) -> char {
        match self {
            CabinClass::Economy => 'y',
            CabinClass::PremiumEconomy => 's',
            CabinClass::Business => 'c',
            CabinClass::First => 'f',
        }
    }
}

impl fmt::Display for CabinClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CabinClass::Economy => "Economy",
            CabinClass::PremiumEconomy => "PremiumEconomy",
            CabinClass::Business => "Business",
            CabinClass::First => "First",
        };
        f.write_str(name)
    }
}

/// Outbound and inbound travel dates of a round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TravelDates {
    outbound: NaiveDate,
    inbound: NaiveDate,
}

impl TravelDates {
    /// Create a date pair.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidDates`] if `inbound` is before `outbound`.
    /// Same-day returns are allowed.
    pub fn new(outbound: NaiveDate, inbound: NaiveDate) -> Result<Self, DomainError> {
        if inbound < outbound {
            return Err(DomainError::InvalidDates { outbound, inbound });
        }
        Ok(Self { outbound, inbound })
    }

    /// Returns the outbound date.
    pub fn outbound(&self) -> NaiveDate {
        self.outbound
    }

    /// Returns the inbound date.
    pub fn inbound(&self) -> NaiveDate {
        self.inbound
    }
}

/// Immutable parameters of one round-trip search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchContext {
    /// Departure city
    pub origin: IataCode,
    /// Destination city
    pub destination: IataCode,
    /// Travel dates
    pub dates: TravelDates,
    /// Requested cabin
    pub cabin: CabinClass,
    /// Number of adult passengers
    pub passengers: u8,
    /// Carrier codes every leg must be flown by (empty = any)
    pub airlines: Vec<String>,
}

/// Parameters of an alternative-route search through an intermediate city.
#[derive(Debug, Clone, PartialEq)]
pub struct ViaContext {
    /// The end-to-end search
    pub search: SearchContext,
    /// Intermediate city both round trips meet at
    pub via: IataCode,
}

impl ViaContext {
    /// Create a via context.
    pub fn new(search: SearchContext, via: IataCode) -> Self {
        Self { search, via }
    }
}
