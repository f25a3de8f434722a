//! Date and timestamp parsing for site data.
//!
//! The site reports leg times as local wall-clock timestamps
//! (`2025-03-01 08:15:00`), sometimes in ISO form with a `T` separator or an
//! offset. Travel dates are plain `YYYY-MM-DD`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Error returned when parsing an invalid date or timestamp.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time {value:?}: {reason}")]
pub struct TimeError {
    value: String,
    reason: &'static str,
}

impl TimeError {
    fn new(value: &str, reason: &'static str) -> Self {
        Self {
            value: value.to_string(),
            reason,
        }
    }
}

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a local departure/arrival timestamp.
///
/// Offsets are dropped: legs are compared and displayed in the local time
/// of the airport they refer to.
///
/// # Examples
///
/// ```
/// use fare_search::domain::parse_timestamp;
///
/// let t = parse_timestamp("2025-03-01 08:15:00").unwrap();
/// assert_eq!(t.to_string(), "2025-03-01 08:15:00");
/// assert_eq!(parse_timestamp("2025-03-01T08:15:00+08:00").unwrap(), t);
/// ```
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, TimeError> {
    let s = s.trim();

    for format in TIMESTAMP_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(t);
        }
    }

    DateTime::parse_from_rfc3339(s)
        .map(|t| t.naive_local())
        .map_err(|_| TimeError::new(s, "expected YYYY-MM-DD HH:MM[:SS]"))
}

/// Parse a travel date in `YYYY-MM-DD` format.
pub fn parse_date(s: &str) -> Result<NaiveDate, TimeError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| TimeError::new(s, "expected YYYY-MM-DD"))
}
