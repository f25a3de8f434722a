//! Search payload DTOs.
//!
//! These types map directly to the JSON carried by the site's search data
//! events. Only the fields the extractor reads are modelled; serde ignores
//! the rest.

use serde::Deserialize;

/// Top-level search payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Summary of the search.
    pub basic_info: BasicInfo,

    /// Offers, cheapest first when sorted by price.
    #[serde(default)]
    pub itinerary_list: Vec<ItineraryEntry>,
}

/// Search summary.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicInfo {
    /// Number of offers the site found.
    #[serde(default)]
    pub record_count: u32,

    /// Search-level token referenced by follow-up searches.
    #[serde(alias = "criteriaToken")]
    pub product_id: Option<String>,
}

/// One offer: the journeys it covers and the fares it is sold at.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryEntry {
    pub journey_list: Vec<Journey>,
    pub policies: Vec<Policy>,
}

/// One direction of travel.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Journey {
    /// Total duration in minutes, including connections.
    pub duration: i64,

    /// Flight sections in travel order.
    pub trans_section_list: Vec<TransSection>,
}

/// A single flight section.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransSection {
    pub depart_point: Point,
    pub arrive_point: Point,

    /// Local departure time, e.g. `2025-03-01 08:05:00`.
    pub depart_date_time: String,

    /// Local arrival time.
    pub arrive_date_time: String,

    pub flight_info: FlightInfo,

    /// Section duration in minutes.
    pub duration: i64,
}

/// An airport together with the city it serves.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    pub city_code: String,
    pub city_name: Option<String>,
    pub airport_code: String,
}

/// Marketing flight designator.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightInfo {
    pub airline_code: String,
    pub flight_no: String,
}

/// A fare the offer is sold at.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    /// Offer-level token referenced by follow-up searches.
    #[serde(alias = "shoppingId")]
    pub policy_id: String,

    pub price: Price,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub total_price: f64,
}
