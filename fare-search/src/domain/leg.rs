//! Flight leg type.
//!
//! A `FlightLeg` is one physical flight segment between two airports. Legs
//! are created by the extractor and never modified afterwards.

use std::fmt;

use chrono::{Duration, NaiveDateTime};

use super::IataCode;

/// One flight segment.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightLeg {
    /// City the flight departs from
    pub departure_city: IataCode,
    /// Airport the flight departs from
    pub departure_airport: IataCode,
    /// City the flight arrives in
    pub arrival_city: IataCode,
    /// Airport the flight arrives at
    pub arrival_airport: IataCode,
    /// Local departure time
    pub departure_time: NaiveDateTime,
    /// Local arrival time
    pub arrival_time: NaiveDateTime,
    /// Marketing carrier code (e.g. "BR")
    pub carrier: String,
    /// Flight number including carrier prefix (e.g. "BR189")
    pub flight_number: String,
    /// Block time as reported by the site
    pub duration: Duration,
}

impl FlightLeg {
    /// Returns true if this leg is flown by one of the given carriers.
    ///
    /// Carrier codes are compared case-insensitively.
    pub fn is_operated_by_any(&self, carriers: &[String]) -> bool {
        carriers
            .iter()
            .any(|c| c.eq_ignore_ascii_case(&self.carrier))
    }
}

impl fmt::Display for FlightLeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} -> {} {}",
            self.flight_number,
            self.departure_airport,
            self.departure_time.format("%Y-%m-%d %H:%M"),
            self.arrival_airport,
            self.arrival_time.format("%H:%M"),
        )
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::leg;

    #[test]
    fn carrier_filter_is_case_insensitive() {
        let leg = leg("TPE", "NRT", "BR198");
        assert!(leg.is_operated_by_any(&["br".to_string()]));
        assert!(leg.is_operated_by_any(&["CI".to_string(), "BR".to_string()]));
        assert!(!leg.is_operated_by_any(&["CI".to_string()]));
        assert!(!leg.is_operated_by_any(&[]));
    }

    #[test]
    fn display() {
        let leg = leg("TPE", "NRT", "BR198");
        assert_eq!(leg.to_string(), "BR198 TPE 2025-03-01 08:00 -> NRT 11:00");
    }
}
