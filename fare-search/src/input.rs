//! Run input.
//!
//! A run is described by a JSON document naming the round trip, the date
//! pairs to search and optional intermediate cities. Validation turns it
//! into one direct root task per date pair plus one alternative root task
//! per (date pair, intermediate city).

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::domain::{
    CabinClass, DomainError, IataCode, InvalidIataCode, SearchContext, TimeError, TravelDates,
    ViaContext, parse_date,
};
use crate::search::{SearchConfig, StageTask};

/// Maximum passengers per search accepted by the site.
pub const MAX_PASSENGERS: u8 = 9;

/// Error loading or validating a run input.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// Input file could not be read
    #[error("failed to read input {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Input is not valid JSON of the expected shape
    #[error("invalid input JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Required field absent or empty
    #[error("missing required input: {0}")]
    Missing(&'static str),

    /// City code could not be parsed
    #[error("invalid {field} {value:?}: {source}")]
    InvalidCity {
        field: &'static str,
        value: String,
        #[source]
        source: InvalidIataCode,
    },

    /// Date could not be parsed
    #[error(transparent)]
    InvalidDate(#[from] TimeError),

    /// Inbound date before outbound date
    #[error(transparent)]
    InvalidPeriod(#[from] DomainError),

    /// Passenger count outside 1..=9
    #[error("numberOfPeople must be between 1 and 9, got {0}")]
    InvalidPassengers(u8),

    /// A limit that must be positive was zero
    #[error("{0} must be positive")]
    ZeroLimit(&'static str),
}

/// One outbound/inbound date pair.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimePeriod {
    pub outbound_date: String,
    pub inbound_date: String,
}

/// Raw run input, as supplied by the user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunInput {
    pub main_departure_city: String,
    pub target_city: String,
    #[serde(default)]
    pub cabin_class: CabinClass,
    #[serde(default = "default_passengers")]
    pub number_of_people: u8,
    #[serde(default)]
    pub time_periods: Vec<TimePeriod>,
    /// Intermediate cities; each triggers the alternative pattern
    #[serde(default)]
    pub alternative_departure_cities: Vec<String>,
    /// Carrier codes every leg must be flown by (empty = any)
    #[serde(default)]
    pub airlines: Vec<String>,
    /// Stop starting new searches once this many results exist
    pub max_flights_per_search: Option<usize>,
    /// Maximum number of page fetches for the whole run
    pub max_requests_per_crawl: Option<usize>,
    /// Candidates kept per stage
    pub top_flights_per_stage: Option<usize>,
}

fn default_passengers() -> u8 {
    1
}

impl RunInput {
    /// Parse an input document.
    pub fn from_json(json: &str) -> Result<Self, InputError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse an input file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| InputError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Validate the input and build the top-level tasks.
    ///
    /// Direct roots come first for each period, followed by that period's
    /// alternative roots in input order.
    pub fn root_tasks(&self) -> Result<Vec<StageTask>, InputError> {
        let origin = city("mainDepartureCity", &self.main_departure_city)?;
        let destination = city("targetCity", &self.target_city)?;
        let vias = self
            .alternative_departure_cities
            .iter()
            .map(|c| city("alternativeDepartureCities", c))
            .collect::<Result<Vec<_>, _>>()?;

        if self.time_periods.is_empty() {
            return Err(InputError::Missing("timePeriods"));
        }
        if !(1..=MAX_PASSENGERS).contains(&self.number_of_people) {
            return Err(InputError::InvalidPassengers(self.number_of_people));
        }

        let airlines: Vec<String> = self
            .airlines
            .iter()
            .map(|a| a.trim().to_ascii_uppercase())
            .filter(|a| !a.is_empty())
            .collect();

        let mut roots = Vec::with_capacity(self.time_periods.len() * (1 + vias.len()));
        for period in &self.time_periods {
            let dates = TravelDates::new(
                parse_date(&period.outbound_date)?,
                parse_date(&period.inbound_date)?,
            )?;
            let search = SearchContext {
                origin,
                destination,
                dates,
                cabin: self.cabin_class,
                passengers: self.number_of_people,
                airlines: airlines.clone(),
            };

            roots.push(StageTask::direct(search.clone()));
            roots.extend(
                vias.iter()
                    .map(|&via| StageTask::alternative(ViaContext::new(search.clone(), via))),
            );
        }

        info!(
            origin = %origin,
            destination = %destination,
            periods = self.time_periods.len(),
            via_cities = vias.len(),
            roots = roots.len(),
            "run input validated"
        );
        Ok(roots)
    }

    /// Apply the input's limits on top of `base`.
    pub fn search_config(&self, base: SearchConfig) -> Result<SearchConfig, InputError> {
        let mut config = base;
        if let Some(k) = self.top_flights_per_stage {
            if k == 0 {
                return Err(InputError::ZeroLimit("topFlightsPerStage"));
            }
            config.top_k = k;
        }
        if let Some(max) = self.max_flights_per_search {
            if max == 0 {
                return Err(InputError::ZeroLimit("maxFlightsPerSearch"));
            }
            config.max_results = Some(max);
        }
        if let Some(max) = self.max_requests_per_crawl {
            if max == 0 {
                return Err(InputError::ZeroLimit("maxRequestsPerCrawl"));
            }
            config.max_requests = max;
        }
        Ok(config)
    }
}

fn city(field: &'static str, value: &str) -> Result<IataCode, InputError> {
    if value.trim().is_empty() {
        return Err(InputError::Missing(field));
    }
    IataCode::parse_normalized(value).map_err(|source| InputError::InvalidCity {
        field,
        value: value.to_string(),
        source,
    })
}
