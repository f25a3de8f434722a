//! Produced record shape.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::{FlightLeg, IataCode, RoutePattern, RouteResult};

/// One flight of a produced record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegRecord {
    pub departure_airport: IataCode,
    pub departure_time: NaiveDateTime,
    pub arrival_airport: IataCode,
    pub arrival_time: NaiveDateTime,
    pub carrier: String,
    pub flight_number: String,
    pub duration_minutes: i64,
}

impl From<&FlightLeg> for LegRecord {
    fn from(leg: &FlightLeg) -> Self {
        Self {
            departure_airport: leg.departure_airport,
            departure_time: leg.departure_time,
            arrival_airport: leg.arrival_airport,
            arrival_time: leg.arrival_time,
            carrier: leg.carrier.clone(),
            flight_number: leg.flight_number.clone(),
            duration_minutes: leg.duration.num_minutes(),
        }
    }
}

/// A route result as written to storage or returned over HTTP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRecord {
    pub pattern: RoutePattern,
    pub origin: IataCode,
    pub destination: IataCode,
    pub intermediate_city: Option<IataCode>,
    pub outbound_date: NaiveDate,
    pub inbound_date: NaiveDate,
    pub total_price: f64,
    pub total_duration_minutes: i64,
    pub product_id: String,
    pub policy_id: String,
    pub legs: Vec<LegRecord>,
}

impl From<&RouteResult> for RouteRecord {
    fn from(result: &RouteResult) -> Self {
        let itinerary = result.itinerary();
        Self {
            pattern: result.pattern(),
            origin: result.origin(),
            destination: result.destination(),
            intermediate_city: result.via(),
            outbound_date: result.dates().outbound(),
            inbound_date: result.dates().inbound(),
            total_price: result.total_price(),
            total_duration_minutes: itinerary.total_duration().num_minutes(),
            product_id: itinerary.product_id().to_string(),
            policy_id: itinerary.policy_id().to_string(),
            legs: itinerary.legs().iter().map(LegRecord::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::itinerary::fixtures::itinerary;
    use crate::domain::{CabinClass, SearchContext, TravelDates, ViaContext};
    use serde_json::json;

    fn context() -> SearchContext {
        let d = |day| NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
        SearchContext {
            origin: IataCode::parse("TPE").unwrap(),
            destination: IataCode::parse("PRG").unwrap(),
            dates: TravelDates::new(d(1), d(8)).unwrap(),
            cabin: CabinClass::Economy,
            passengers: 1,
            airlines: vec![],
        }
    }

    #[test]
    fn direct_record_json() {
        let result = RouteResult::direct(&context(), itinerary(&["TPE", "PRG", "TPE"], 420.5, "pol"));
        let value = serde_json::to_value(RouteRecord::from(&result)).unwrap();

        assert_eq!(value["pattern"], json!("DIRECT"));
        assert_eq!(value["origin"], json!("TPE"));
        assert_eq!(value["destination"], json!("TPE"));
        assert_eq!(value["intermediateCity"], json!(null));
        assert_eq!(value["outboundDate"], json!("2025-03-01"));
        assert_eq!(value["inboundDate"], json!("2025-03-08"));
        assert_eq!(value["totalPrice"], json!(420.5));
        assert_eq!(value["totalDurationMinutes"], json!(360));
        assert_eq!(value["policyId"], json!("pol"));
        assert_eq!(value["legs"].as_array().unwrap().len(), 2);
        assert_eq!(
            value["legs"][0],
            json!({
                "departureAirport": "TPE",
                "departureTime": "2025-03-01T08:00:00",
                "arrivalAirport": "PRG",
                "arrivalTime": "2025-03-01T11:00:00",
                "carrier": "BR",
                "flightNumber": "BR100",
                "durationMinutes": 180
            })
        );
    }

    #[test]
    fn alternative_record_names_the_via() {
        let via = ViaContext::new(context(), IataCode::parse("VIE").unwrap());
        let result = RouteResult::alternative(&via, itinerary(&["TPE", "VIE", "PRG"], 1.0, "x"));
        let record = RouteRecord::from(&result);

        assert_eq!(record.pattern, RoutePattern::Alternative);
        assert_eq!(record.intermediate_city.map(|c| c.to_string()).as_deref(), Some("VIE"));

        let json = serde_json::to_string(&record).unwrap();
        let back: RouteRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
