//! Conversion from search payloads to domain itineraries.
//!
//! Each offer contributes one itinerary built from its first journey and
//! its first fare. Further journeys and fares are not explored: the site
//! lists its best fare first and the pipeline only needs one price per
//! offer.

use chrono::Duration;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::{
    DomainError, FlightItinerary, FlightLeg, IataCode, InvalidIataCode, OfferRef, TimeError,
    parse_timestamp,
};

use super::types::{ItineraryEntry, SearchResponse, TransSection};

/// Error extracting itineraries from a payload.
///
/// Any error fails the whole payload; partial lists are never returned.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ExtractionError {
    /// Payload did not match the expected shape
    #[error("unexpected payload shape: {0}")]
    Shape(String),

    /// Missing required field
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// City or airport code could not be parsed
    #[error("invalid location code {value:?}: {source}")]
    InvalidCode {
        value: String,
        #[source]
        source: InvalidIataCode,
    },

    /// Reported duration is negative or out of range
    #[error("invalid {field} of {minutes} minutes")]
    InvalidDuration { field: &'static str, minutes: i64 },

    /// Leg time could not be parsed
    #[error(transparent)]
    InvalidTime(#[from] TimeError),

    /// Offer could not form an itinerary
    #[error(transparent)]
    Invalid(#[from] DomainError),
}

/// Extract priced itineraries from a raw search payload.
///
/// Offers are returned in payload order. A record count of zero or one is
/// logged but is not an error; the result may legitimately be empty.
pub fn extract_itineraries(payload: &Value) -> Result<Vec<FlightItinerary>, ExtractionError> {
    let response = SearchResponse::deserialize(payload)
        .map_err(|e| ExtractionError::Shape(e.to_string()))?;

    if response.basic_info.record_count <= 1 {
        warn!(
            record_count = response.basic_info.record_count,
            "few or no offers in search payload"
        );
    }

    if response.itinerary_list.is_empty() {
        return Ok(Vec::new());
    }

    let product_id = response
        .basic_info
        .product_id
        .as_deref()
        .ok_or(ExtractionError::MissingField("basicInfo.productId"))?;

    let itineraries = response
        .itinerary_list
        .iter()
        .map(|entry| convert_entry(entry, product_id))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(count = itineraries.len(), "extracted itineraries");
    Ok(itineraries)
}

fn convert_entry(entry: &ItineraryEntry, product_id: &str) -> Result<FlightItinerary, ExtractionError> {
    let journey = entry
        .journey_list
        .first()
        .ok_or(ExtractionError::MissingField("itineraryList[].journeyList[0]"))?;
    let policy = entry
        .policies
        .first()
        .ok_or(ExtractionError::MissingField("itineraryList[].policies[0]"))?;

    let legs = journey
        .trans_section_list
        .iter()
        .map(convert_section)
        .collect::<Result<Vec<_>, _>>()?;

    let itinerary = FlightItinerary::new(
        legs,
        policy.price.total_price,
        minutes("journeyList[].duration", journey.duration)?,
        OfferRef::new(product_id, policy.policy_id.as_str()),
    )?;
    Ok(itinerary)
}

fn convert_section(section: &TransSection) -> Result<FlightLeg, ExtractionError> {
    Ok(FlightLeg {
        departure_city: code(&section.depart_point.city_code)?,
        departure_airport: code(&section.depart_point.airport_code)?,
        arrival_city: code(&section.arrive_point.city_code)?,
        arrival_airport: code(&section.arrive_point.airport_code)?,
        departure_time: parse_timestamp(&section.depart_date_time)?,
        arrival_time: parse_timestamp(&section.arrive_date_time)?,
        carrier: section.flight_info.airline_code.trim().to_ascii_uppercase(),
        flight_number: section.flight_info.flight_no.trim().to_string(),
        duration: minutes("transSectionList[].duration", section.duration)?,
    })
}

fn minutes(field: &'static str, value: i64) -> Result<Duration, ExtractionError> {
    Duration::try_minutes(value)
        .filter(|_| value >= 0)
        .ok_or(ExtractionError::InvalidDuration { field, minutes: value })
}

fn code(value: &str) -> Result<IataCode, ExtractionError> {
    IataCode::parse_normalized(value).map_err(|source| ExtractionError::InvalidCode {
        value: value.to_string(),
        source,
    })
}


#[cfg(test)]
mod tests {
    use super::fixtures::{offer, payload, section};
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_offers_in_order() {
        let payload = payload(
            "prod-1",
            vec![
                offer(&["TPE", "HKG", "PRG"], 25_000.0, "pol-a"),
                offer(&["TPE", "PRG"], 31_000.0, "pol-b"),
            ],
        );

        let its = extract_itineraries(&payload).unwrap();

        assert_eq!(its.len(), 2);
        assert_eq!(its[0].total_price(), 25_000.0);
        assert_eq!(its[0].leg_count(), 2);
        assert_eq!(its[0].total_duration(), Duration::minutes(360));
        assert_eq!(its[0].origin().as_str(), "TPE");
        assert_eq!(its[0].destination().as_str(), "PRG");
        assert_eq!(its[0].product_id(), "prod-1");
        assert_eq!(its[0].policy_id(), "pol-a");
        assert_eq!(its[1].policy_id(), "pol-b");

        let leg = &its[0].legs()[1];
        assert_eq!(leg.carrier, "BR");
        assert_eq!(leg.flight_number, "BR101");
        assert_eq!(leg.departure_airport.as_str(), "HKG");
    }

    #[test]
    fn only_first_journey_and_policy_are_used() {
        let mut entry = offer(&["TPE", "NRT"], 100.0, "first");
        entry["journeyList"]
            .as_array_mut()
            .unwrap()
            .push(json!({ "duration": 1, "transSectionList": [section("NRT", "TPE", "CI101")] }));
        entry["policies"]
            .as_array_mut()
            .unwrap()
            .push(json!({ "policyId": "second", "price": { "totalPrice": 1.0 } }));

        let its = extract_itineraries(&payload("p", vec![entry])).unwrap();

        assert_eq!(its[0].policy_id(), "first");
        assert_eq!(its[0].total_price(), 100.0);
        assert_eq!(its[0].destination().as_str(), "NRT");
    }

    #[test]
    fn reported_duration_is_not_derived() {
        let mut entry = offer(&["TPE", "NRT"], 100.0, "x");
        entry["journeyList"][0]["duration"] = json!(999);
        let its = extract_itineraries(&payload("p", vec![entry])).unwrap();
        assert_eq!(its[0].total_duration(), Duration::minutes(999));
    }

    #[test]
    fn out_of_range_durations_are_rejected() {
        let mut huge = offer(&["TPE", "NRT"], 100.0, "x");
        huge["journeyList"][0]["duration"] = json!(i64::MAX);
        assert!(matches!(
            extract_itineraries(&payload("p", vec![huge])),
            Err(ExtractionError::InvalidDuration {
                field: "journeyList[].duration",
                minutes: i64::MAX
            })
        ));

        let mut negative = offer(&["TPE", "NRT"], 100.0, "x");
        negative["journeyList"][0]["transSectionList"][0]["duration"] = json!(-5);
        assert!(matches!(
            extract_itineraries(&payload("p", vec![negative])),
            Err(ExtractionError::InvalidDuration {
                field: "transSectionList[].duration",
                minutes: -5
            })
        ));
    }

    #[test]
    fn empty_list_is_not_an_error() {
        let empty = json!({ "basicInfo": { "recordCount": 0 } });
        assert!(extract_itineraries(&empty).unwrap().is_empty());
    }

    #[test]
    fn alternative_field_names() {
        let payload = json!({
            "basicInfo": { "recordCount": 1, "criteriaToken": "tok" },
            "itineraryList": [{
                "journeyList": [{ "duration": 180, "transSectionList": [section("TPE", "NRT", "BR198")] }],
                "policies": [{ "shoppingId": "shop", "price": { "totalPrice": 5.0 } }]
            }]
        });
        let its = extract_itineraries(&payload).unwrap();
        assert_eq!(its[0].product_id(), "tok");
        assert_eq!(its[0].policy_id(), "shop");
    }

    #[test]
    fn any_bad_offer_fails_the_whole_payload() {
        let mut bad = offer(&["TPE", "NRT"], 100.0, "bad");
        bad["journeyList"][0]["transSectionList"][0]["departDateTime"] = json!("soon");

        let result = extract_itineraries(&payload(
            "p",
            vec![offer(&["TPE", "NRT"], 90.0, "good"), bad],
        ));

        assert!(matches!(result, Err(ExtractionError::InvalidTime(_))));
    }

    #[test]
    fn structural_errors() {
        assert!(matches!(
            extract_itineraries(&json!({ "itineraryList": [] })),
            Err(ExtractionError::Shape(_))
        ));
        assert!(matches!(
            extract_itineraries(&json!(null)),
            Err(ExtractionError::Shape(_))
        ));

        let mut no_policy = offer(&["TPE", "NRT"], 1.0, "x");
        no_policy["policies"] = json!([]);
        assert!(matches!(
            extract_itineraries(&payload("p", vec![no_policy])),
            Err(ExtractionError::MissingField(_))
        ));

        let mut no_legs = offer(&["TPE", "NRT"], 1.0, "x");
        no_legs["journeyList"][0]["transSectionList"] = json!([]);
        assert!(matches!(
            extract_itineraries(&payload("p", vec![no_legs])),
            Err(ExtractionError::Invalid(DomainError::EmptyItinerary))
        ));

        let missing_product = json!({
            "basicInfo": { "recordCount": 1 },
            "itineraryList": [offer(&["TPE", "NRT"], 1.0, "x")]
        });
        assert!(matches!(
            extract_itineraries(&missing_product),
            Err(ExtractionError::MissingField("basicInfo.productId"))
        ));
    }

    #[test]
    fn invalid_city_code() {
        let mut entry = offer(&["TPE", "NRT"], 1.0, "x");
        entry["journeyList"][0]["transSectionList"][0]["arrivePoint"]["cityCode"] = json!("TOKYO");
        assert!(matches!(
            extract_itineraries(&payload("p", vec![entry])),
            Err(ExtractionError::InvalidCode { .. })
        ));
    }
}
