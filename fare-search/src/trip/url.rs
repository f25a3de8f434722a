//! Search page URLs.
//!
//! A round-trip search takes two pages: `showfarefirst` lists outbound
//! offers; `ShowFareNext` lists the inbound offers for one chosen outbound
//! offer, identified by its product id (`criteriaToken`) and policy id
//! (`shoppingid`/`groupKey`).

use reqwest::Url;

use crate::search::{QueryKind, SearchQuery};

use super::client::TripConfig;
use super::error::FetchError;

/// Build the page URL for `query`.
pub fn query_url(config: &TripConfig, query: &SearchQuery) -> Result<Url, FetchError> {
    let from = query.from.as_str().to_ascii_lowercase();
    let to = query.to.as_str().to_ascii_lowercase();
    let outbound = query.dates.outbound().format("%Y-%m-%d").to_string();
    let inbound = query.dates.inbound().format("%Y-%m-%d").to_string();
    let quantity = query.passengers.to_string();
    let cabin = query.cabin.code();

    let (path, params): (&str, Vec<(&str, String)>) = match &query.kind {
        QueryKind::First => (
            "showfarefirst",
            vec![
                ("dcity", from),
                ("acity", to),
                ("ddate", outbound),
                ("rdate", inbound),
                ("triptype", "rt".into()),
                ("class", cabin.to_string()),
                ("lowpricesource", "searchform".into()),
                ("quantity", quantity),
                ("searchboxarg", "t".into()),
                ("nonstoponly", "off".into()),
                ("sort", "price".into()),
            ],
        ),
        QueryKind::Next(offer) => (
            "ShowFareNext",
            vec![
                ("pagesource", "list".into()),
                ("triptype", "RT".into()),
                ("class", cabin.to_ascii_uppercase().to_string()),
                ("quantity", quantity),
                ("childqty", "0".into()),
                ("babyqty", "0".into()),
                ("jumptype", "GoToNextJournay".into()),
                ("dcity", from),
                ("acity", to),
                ("ddate", outbound),
                ("rdate", inbound),
                ("currentseqno", "2".into()),
                ("criteriaToken", offer.product_id.clone()),
                ("shoppingid", offer.policy_id.clone()),
                ("groupKey", offer.policy_id.clone()),
                ("locale", config.locale.clone()),
                ("curr", config.currency.clone()),
            ],
        ),
    };

    let base = config.base_url.trim_end_matches('/');
    Url::parse_with_params(&format!("{base}/{path}"), &params)
        .map_err(|e| FetchError::InvalidUrl(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CabinClass, IataCode, OfferRef, SearchContext, TravelDates};
    use chrono::NaiveDate;

    fn context() -> SearchContext {
        let d = |day| NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
        SearchContext {
            origin: IataCode::parse("TPE").unwrap(),
            destination: IataCode::parse("PRG").unwrap(),
            dates: TravelDates::new(d(1), d(8)).unwrap(),
            cabin: CabinClass::Business,
            passengers: 2,
            airlines: vec![],
        }
    }

    fn param(url: &Url, key: &str) -> Option<String> {
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    #[test]
    fn first_page_url() {
        let ctx = context();
        let query = SearchQuery::first(ctx.origin, ctx.destination, &ctx);
        let url = query_url(&TripConfig::default(), &query).unwrap();

        assert_eq!(url.path(), "/flights/showfarefirst");
        assert_eq!(param(&url, "dcity").as_deref(), Some("tpe"));
        assert_eq!(param(&url, "acity").as_deref(), Some("prg"));
        assert_eq!(param(&url, "ddate").as_deref(), Some("2025-03-01"));
        assert_eq!(param(&url, "rdate").as_deref(), Some("2025-03-08"));
        assert_eq!(param(&url, "class").as_deref(), Some("c"));
        assert_eq!(param(&url, "quantity").as_deref(), Some("2"));
        assert_eq!(param(&url, "sort").as_deref(), Some("price"));
        assert_eq!(param(&url, "criteriaToken"), None);
    }

    #[test]
    fn next_page_url_carries_offer() {
        let ctx = context();
        let offer = OfferRef::new("tok en", "pol-1");
        let query = SearchQuery::next(ctx.origin, ctx.destination, &ctx, &offer);
        let url = query_url(&TripConfig::default(), &query).unwrap();

        assert_eq!(url.path(), "/flights/ShowFareNext");
        assert_eq!(param(&url, "class").as_deref(), Some("C"));
        assert_eq!(param(&url, "criteriaToken").as_deref(), Some("tok en"));
        assert_eq!(param(&url, "shoppingid").as_deref(), Some("pol-1"));
        assert_eq!(param(&url, "groupKey").as_deref(), Some("pol-1"));
        assert_eq!(param(&url, "locale").as_deref(), Some("zh-TW"));
        assert_eq!(param(&url, "curr").as_deref(), Some("TWD"));
    }

    #[test]
    fn bad_base_url() {
        let ctx = context();
        let query = SearchQuery::first(ctx.origin, ctx.destination, &ctx);
        let config = TripConfig::default().with_base_url("not a url");
        assert!(matches!(
            query_url(&config, &query),
            Err(FetchError::InvalidUrl(_))
        ));
    }
}
