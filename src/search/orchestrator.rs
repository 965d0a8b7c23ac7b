//! Parallel fan-out of one multi-origin request across its origins.

use std::sync::Arc;

use futures::future::join_all;

use crate::model::{MultiOriginSearchRequest, OriginPriceMap};
use crate::provider::{CallContext, Provider};
use crate::{Error, Result};

/// Runs the per-origin searches of a [`MultiOriginSearchRequest`] in parallel
/// against one (usually layered) provider and collects them into an
/// [`OriginPriceMap`].
///
/// A failed origin is logged and excluded from the map; it never aborts its
/// siblings. Cancellation is the one exception and fails the whole search.
pub struct MultiOriginSearcher {
    provider: Arc<dyn Provider>,
}

impl MultiOriginSearcher {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }

    pub async fn search_many(
        &self,
        request: &MultiOriginSearchRequest,
        ctx: &CallContext,
    ) -> Result<OriginPriceMap> {
        request.validate()?;

        let mut origins: Vec<&String> = request.origins.iter().collect();
        origins.sort();
        origins.dedup();

        let lookups = origins.into_iter().map(|origin| {
            let single = request.to_single_origin(origin);
            async move {
                let outcome = self.provider.search(&single, ctx).await;
                (origin, outcome)
            }
        });

        let mut map = OriginPriceMap::with_capacity(request.origins.len());
        for (origin, outcome) in join_all(lookups).await {
            match outcome {
                Ok(mut quotes) => {
                    quotes.sort_by(|a, b| {
                        (a.price, &a.destination_city).cmp(&(b.price, &b.destination_city))
                    });
                    map.insert(origin.clone(), quotes);
                }
                Err(Error::Cancelled) => return Err(Error::Cancelled),
                Err(err) => {
                    tracing::warn!(
                        origin = origin.as_str(),
                        provider = self.provider.name(),
                        error = %err,
                        "origin lookup failed, excluded from aggregation"
                    );
                }
            }
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DestinationFilter, PriceQuote, SearchRequest};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tokio_util::sync::CancellationToken;

    /// Fails for the origins it is told to; quotes CDG for the rest.
    struct PerOrigin {
        failing: Vec<&'static str>,
    }

    #[async_trait]
    impl Provider for PerOrigin {
        fn name(&self) -> &str {
            "per-origin"
        }

        async fn search(
            &self,
            request: &SearchRequest,
            ctx: &CallContext,
        ) -> crate::Result<Vec<PriceQuote>> {
            if ctx.cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            if self.failing.contains(&request.origin.as_str()) {
                return Err(Error::Network("connection reset".into()));
            }
            Ok(vec![
                PriceQuote {
                    origin: request.origin.clone(),
                    destination_city: "FCO".into(),
                    destination_country: "IT".into(),
                    price: dec!(420.00),
                    currency: "USD".into(),
                },
                PriceQuote {
                    origin: request.origin.clone(),
                    destination_city: "CDG".into(),
                    destination_country: "FR".into(),
                    price: dec!(380.00),
                    currency: "USD".into(),
                },
            ])
        }
    }

    fn request(origins: &[&str]) -> MultiOriginSearchRequest {
        MultiOriginSearchRequest {
            origins: origins.iter().map(|s| s.to_string()).collect(),
            departure_date: NaiveDate::from_ymd_opt(2026, 9, 15).unwrap(),
            return_date: None,
            currency: "USD".into(),
            filter: DestinationFilter::None,
        }
    }

    #[tokio::test]
    async fn collects_every_origin() {
        let searcher = MultiOriginSearcher::new(Arc::new(PerOrigin { failing: vec![] }));
        let map = searcher
            .search_many(&request(&["JFK", "SFO"]), &CallContext::new())
            .await
            .unwrap();
        assert_eq!(map.len(), 2);
        // Each origin's list comes back sorted by price.
        assert_eq!(map["JFK"][0].destination_city, "CDG");
        assert_eq!(map["JFK"][1].destination_city, "FCO");
    }

    #[tokio::test]
    async fn failed_origin_is_excluded_not_fatal() {
        let searcher =
            MultiOriginSearcher::new(Arc::new(PerOrigin { failing: vec!["SFO"] }));
        let map = searcher
            .search_many(&request(&["JFK", "SFO", "LHR"]), &CallContext::new())
            .await
            .unwrap();
        assert_eq!(map.len(), 2);
        assert!(!map.contains_key("SFO"));
    }

    #[tokio::test]
    async fn all_origins_failing_yields_an_empty_map() {
        let searcher = MultiOriginSearcher::new(Arc::new(PerOrigin {
            failing: vec!["JFK", "SFO"],
        }));
        let map = searcher
            .search_many(&request(&["JFK", "SFO"]), &CallContext::new())
            .await
            .unwrap();
        assert!(map.is_empty());
    }

    #[tokio::test]
    async fn duplicate_origins_are_searched_once() {
        let searcher = MultiOriginSearcher::new(Arc::new(PerOrigin { failing: vec![] }));
        let map = searcher
            .search_many(&request(&["JFK", "JFK", "SFO"]), &CallContext::new())
            .await
            .unwrap();
        assert_eq!(map.len(), 2);
    }

    #[tokio::test]
    async fn invalid_request_fails_before_any_lookup() {
        let searcher = MultiOriginSearcher::new(Arc::new(PerOrigin { failing: vec![] }));
        let result = searcher.search_many(&request(&[]), &CallContext::new()).await;
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn cancellation_fails_the_whole_search() {
        let searcher = MultiOriginSearcher::new(Arc::new(PerOrigin { failing: vec![] }));
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = searcher
            .search_many(
                &request(&["JFK", "SFO"]),
                &CallContext::new().with_cancel(cancel),
            )
            .await;
        assert!(matches!(result, Err(Error::Cancelled)));
    }
}
