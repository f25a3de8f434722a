//! Choice between the live site and recorded payloads.

use serde_json::Value;

use crate::search::{PageFetcher, SearchQuery};

use super::client::TripClient;
use super::error::FetchError;
use super::mock::MockFetcher;

/// Where search payloads come from.
#[derive(Clone)]
pub enum SiteFetcher {
    /// Query the site over HTTP
    Live(TripClient),
    /// Serve recorded payloads
    Recorded(MockFetcher),
}

impl SiteFetcher {
    /// Returns true if payloads are recorded rather than live.
    pub fn is_recorded(&self) -> bool {
        matches!(self, SiteFetcher::Recorded(_))
    }
}

impl From<TripClient> for SiteFetcher {
    fn from(client: TripClient) -> Self {
        SiteFetcher::Live(client)
    }
}

impl From<MockFetcher> for SiteFetcher {
    fn from(mock: MockFetcher) -> Self {
        SiteFetcher::Recorded(mock)
    }
}

impl PageFetcher for SiteFetcher {
    async fn fetch(&self, query: &SearchQuery) -> Result<Value, FetchError> {
        match self {
            SiteFetcher::Live(client) => client.fetch(query).await,
            SiteFetcher::Recorded(mock) => mock.fetch(query).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CabinClass, IataCode, SearchContext, TravelDates};
    use crate::trip::TripConfig;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn conversions() {
        let live: SiteFetcher = TripClient::new(TripConfig::default()).unwrap().into();
        assert!(!live.is_recorded());
        let recorded: SiteFetcher = MockFetcher::new().into();
        assert!(recorded.is_recorded());
    }

    #[tokio::test]
    async fn recorded_delegates_to_mock() {
        let mock = MockFetcher::new().with_route("TPE", "NRT", json!({ "page": "first" }));
        let fetcher = SiteFetcher::from(mock.clone());

        let d = |day| NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
        let ctx = SearchContext {
            origin: IataCode::parse("TPE").unwrap(),
            destination: IataCode::parse("NRT").unwrap(),
            dates: TravelDates::new(d(1), d(8)).unwrap(),
            cabin: CabinClass::Economy,
            passengers: 1,
            airlines: vec![],
        };
        let query = SearchQuery::first(ctx.origin, ctx.destination, &ctx);
        assert_eq!(fetcher.fetch(&query).await.unwrap(), json!({ "page": "first" }));
        assert_eq!(mock.call_count(), 1);
    }
}
