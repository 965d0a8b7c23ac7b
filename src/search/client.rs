//! The assembled client: one provider behind the full protection stack.

use std::sync::Arc;

use crate::aggregate;
use crate::cache::{CacheStats, ResponseCache};
use crate::config::{CacheConfig, ResilienceConfig};
use crate::model::{CommonDestination, MultiOriginSearchRequest, OriginPriceMap, PriceQuote, SearchRequest};
use crate::provider::{CallContext, Provider};
use crate::resilience::{CircuitBreaker, CircuitBreakerSnapshot, ConcurrencyGate, ResiliencePolicy};
use crate::Result;

use super::layers::{CachedProvider, ResilientProvider};
use super::orchestrator::MultiOriginSearcher;

/// Wires a raw [`Provider`] into cache → gate → resilience layers and exposes
/// the search and aggregation operations on top.
///
/// The breaker, gate and cache are shared across every origin of every
/// search, so overload and failure handling apply to the provider as a whole.
///
/// ```no_run
/// use std::sync::Arc;
/// use farepoint::provider::{CallContext, FixtureProvider};
/// use farepoint::search::FarepointClient;
/// use farepoint::model::{DestinationFilter, MultiOriginSearchRequest};
///
/// # async fn run() -> farepoint::Result<()> {
/// let client = FarepointClient::builder(Arc::new(FixtureProvider::new())).build();
/// let request = MultiOriginSearchRequest {
///     origins: vec!["JFK".into(), "SFO".into()],
///     departure_date: "2026-09-15".parse().unwrap(),
///     return_date: None,
///     currency: "USD".into(),
///     filter: DestinationFilter::Continent("EU".into()),
/// };
/// let best = client
///     .cheapest_common_destination(&request, &CallContext::new())
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct FarepointClient {
    searcher: MultiOriginSearcher,
    stack: Arc<dyn Provider>,
    cache: Arc<ResponseCache>,
    breaker: Arc<CircuitBreaker>,
    gate: Arc<ConcurrencyGate>,
}

/// Configures and assembles a [`FarepointClient`].
pub struct FarepointClientBuilder {
    provider: Arc<dyn Provider>,
    resilience: ResilienceConfig,
    cache: CacheConfig,
}

impl FarepointClientBuilder {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self {
            provider,
            resilience: ResilienceConfig::default(),
            cache: CacheConfig::default(),
        }
    }

    pub fn with_resilience(mut self, config: ResilienceConfig) -> Self {
        self.resilience = config;
        self
    }

    pub fn with_cache(mut self, config: CacheConfig) -> Self {
        self.cache = config;
        self
    }

    pub fn build(self) -> FarepointClient {
        let breaker = Arc::new(CircuitBreaker::new(
            self.resilience.breaker_threshold,
            self.resilience.break_duration,
        ));
        let gate = Arc::new(ConcurrencyGate::new(
            self.resilience.max_concurrent,
            self.resilience.max_queued,
        ));
        let cache = Arc::new(ResponseCache::new(self.cache));

        let resilient = ResilientProvider::new(
            self.provider,
            Arc::clone(&gate),
            ResiliencePolicy::new(&self.resilience, Arc::clone(&breaker)),
        );
        let stack: Arc<dyn Provider> =
            Arc::new(CachedProvider::new(Arc::new(resilient), Arc::clone(&cache)));

        FarepointClient {
            searcher: MultiOriginSearcher::new(Arc::clone(&stack)),
            stack,
            cache,
            breaker,
            gate,
        }
    }
}

impl FarepointClient {
    pub fn builder(provider: Arc<dyn Provider>) -> FarepointClientBuilder {
        FarepointClientBuilder::new(provider)
    }

    /// Price destinations for a single origin through the full stack.
    pub async fn search(
        &self,
        request: &SearchRequest,
        ctx: &CallContext,
    ) -> Result<Vec<PriceQuote>> {
        self.stack.search(request, ctx).await
    }

    /// Price destinations for every origin in parallel.
    ///
    /// Origins whose lookup failed are absent from the map; see
    /// [`MultiOriginSearcher`].
    pub async fn search_many(
        &self,
        request: &MultiOriginSearchRequest,
        ctx: &CallContext,
    ) -> Result<OriginPriceMap> {
        self.searcher.search_many(request, ctx).await
    }

    /// Full search-and-select: fan out, intersect, pick the optimal common
    /// destination. `Ok(None)` means no destination was reachable from every
    /// surviving origin.
    pub async fn cheapest_common_destination(
        &self,
        request: &MultiOriginSearchRequest,
        ctx: &CallContext,
    ) -> Result<Option<CommonDestination>> {
        let map = self.search_many(request, ctx).await?;
        if map.len() < request.origins.len() {
            tracing::info!(
                requested = request.origins.len(),
                answered = map.len(),
                "aggregating over a partial origin set"
            );
        }
        Ok(aggregate::select_optimal_destination(&map))
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn breaker_snapshot(&self) -> CircuitBreakerSnapshot {
        self.breaker.snapshot()
    }

    /// Permits currently free on the concurrency gate.
    pub fn available_permits(&self) -> usize {
        self.gate.available()
    }
}
