//! Domain types for the fare search engine.
//!
//! This module contains the core data model: legs, priced itineraries,
//! search parameters and final route results. Types enforce their
//! invariants at construction time, so code that receives them can trust
//! their validity.

mod code;
mod context;
mod error;
pub(crate) mod itinerary;
pub(crate) mod leg;
mod route;
mod time;

pub use code::{IataCode, InvalidIataCode};
pub use context::{CabinClass, SearchContext, TravelDates, ViaContext};
pub use error::DomainError;
pub use itinerary::{FlightItinerary, OFFER_ID_SEPARATOR, OfferRef};
pub use leg::FlightLeg;
pub use route::{RoutePattern, RouteResult};
pub use time::{TimeError, parse_date, parse_timestamp};
