//! Trip.com flight search client.
//!
//! This module resolves search queries into raw search payloads and turns
//! those payloads into priced itineraries.
//!
//! Key characteristics of the site:
//! - A round trip is searched in two pages: the first lists outbound
//!   offers, the follow-up lists inbound offers for one chosen outbound
//! - The follow-up price is the price of the whole round trip
//! - Results arrive as a server-sent event stream whose last `data:` event
//!   holds the complete result

mod client;
mod convert;
mod error;
mod mock;
mod source;
mod sse;
mod types;
mod url;

pub use client::{TripClient, TripConfig};
pub use convert::{ExtractionError, extract_itineraries};
pub use error::FetchError;
pub use mock::MockFetcher;
pub use source::SiteFetcher;
pub use sse::last_data_event;
pub use url::query_url;

#[cfg(test)]
pub(crate) use convert::fixtures;
