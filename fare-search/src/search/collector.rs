//! Shared accumulator of route results.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::RouteResult;

#[derive(Debug, Default)]
struct CollectorState {
    results: Vec<RouteResult>,
    count: usize,
}

/// Results collected across all concurrently running tasks of a search run.
///
/// Every append happens under one lock, so concurrent batches are never lost
/// and the count always equals the number of stored results.
#[derive(Debug, Default)]
pub struct ResultsCollector {
    state: Mutex<CollectorState>,
}

impl ResultsCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CollectorState> {
        // Appends never leave the state half-written, so a poisoned lock is still usable
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a batch of results. Returns the new total count.
    pub fn append(&self, results: Vec<RouteResult>) -> usize {
        let mut state = self.lock();
        state.count += results.len();
        state.results.extend(results);
        state.count
    }

    /// All results ordered by ascending total price.
    ///
    /// Ties keep insertion order.
    pub fn all_sorted(&self) -> Vec<RouteResult> {
        let mut results = self.all();
        results.sort_by(|a, b| a.total_price().total_cmp(&b.total_price()));
        results
    }

    /// All results in insertion order.
    pub fn all(&self) -> Vec<RouteResult> {
        self.lock().results.clone()
    }

    /// Returns true once at least `max` results have been collected.
    pub fn is_limit_reached(&self, max: usize) -> bool {
        self.lock().count >= max
    }

    /// Returns the number of collected results.
    pub fn len(&self) -> usize {
        self.lock().count
    }

    /// Returns true if nothing has been collected.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all results.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.results.clear();
        state.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::itinerary::fixtures::itinerary;
    use crate::domain::{CabinClass, IataCode, SearchContext, TravelDates};
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn context() -> SearchContext {
        let d = |day| NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
        SearchContext {
            origin: IataCode::parse("TPE").unwrap(),
            destination: IataCode::parse("NRT").unwrap(),
            dates: TravelDates::new(d(1), d(8)).unwrap(),
            cabin: CabinClass::Economy,
            passengers: 1,
            airlines: vec![],
        }
    }

    fn result(price: f64, policy: &str) -> RouteResult {
        RouteResult::direct(&context(), itinerary(&["TPE", "NRT"], price, policy))
    }

    #[test]
    fn sorted_by_price_with_stable_ties() {
        let collector = ResultsCollector::new();
        collector.append(vec![result(500.0, "a"), result(300.0, "b")]);
        collector.append(vec![result(300.0, "c"), result(100.0, "d")]);

        let policies: Vec<String> = collector
            .all_sorted()
            .iter()
            .map(|r| r.itinerary().policy_id().to_string())
            .collect();

        assert_eq!(policies, vec!["d", "b", "c", "a"]);
        // Insertion order is untouched
        assert_eq!(collector.all()[0].itinerary().policy_id(), "a");
    }

    #[test]
    fn limit_and_count() {
        let collector = ResultsCollector::new();
        assert!(collector.is_empty());
        assert!(collector.is_limit_reached(0));
        assert!(!collector.is_limit_reached(2));

        assert_eq!(collector.append(vec![result(1.0, "a")]), 1);
        assert!(collector.is_limit_reached(1));
        assert!(!collector.is_limit_reached(2));
        assert_eq!(collector.append(vec![result(2.0, "b"), result(3.0, "c")]), 3);
        assert!(collector.is_limit_reached(2));
        assert_eq!(collector.len(), 3);

        collector.clear();
        assert!(collector.is_empty());
        assert!(collector.all_sorted().is_empty());
    }

    #[test]
    fn concurrent_appends_are_not_lost() {
        let collector = Arc::new(ResultsCollector::new());

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let collector = collector.clone();
                std::thread::spawn(move || {
                    for i in 0..50 {
                        let price = f64::from(t * 50 + i);
                        collector.append(vec![result(price, "x"), result(price + 0.5, "y")]);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(collector.len(), 8 * 50 * 2);
        assert_eq!(collector.all().len(), collector.len());

        let sorted = collector.all_sorted();
        assert_eq!(sorted.len(), collector.len());
        assert!(sorted.windows(2).all(|w| w[0].total_price() <= w[1].total_price()));
    }
}
