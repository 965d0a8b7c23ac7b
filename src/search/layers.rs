//! Provider decorators. Each wraps an inner [`Provider`] and implements the
//! same trait, so layers stack in any order the caller assembles them.

use std::sync::Arc;

use async_trait::async_trait;

use crate::cache::{key, ResponseCache};
use crate::model::{PriceQuote, SearchRequest};
use crate::provider::{CallContext, Provider};
use crate::resilience::{ConcurrencyGate, ResiliencePolicy};
use crate::{Error, Result};

const SEARCH_OPERATION: &str = "cheapest-destinations";

/// Applies the full protection stack to an inner provider: a bounded
/// concurrency gate around the call, and the resilience policy (per-attempt
/// timeout, retry with jitter, circuit breaker) inside it.
///
/// The gate permit is acquired once and held across all retry attempts, so a
/// retrying call cannot multiply its concurrency footprint.
pub struct ResilientProvider {
    inner: Arc<dyn Provider>,
    gate: Arc<ConcurrencyGate>,
    policy: ResiliencePolicy,
}

impl ResilientProvider {
    pub fn new(
        inner: Arc<dyn Provider>,
        gate: Arc<ConcurrencyGate>,
        policy: ResiliencePolicy,
    ) -> Self {
        Self { inner, gate, policy }
    }
}

#[async_trait]
impl Provider for ResilientProvider {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn search(&self, request: &SearchRequest, ctx: &CallContext) -> Result<Vec<PriceQuote>> {
        let _permit = tokio::select! {
            _ = ctx.cancel.cancelled() => return Err(Error::Cancelled),
            permit = self.gate.acquire() => permit?,
        };
        self.policy
            .execute(&ctx.cancel, || self.inner.search(request, ctx))
            .await
    }
}

/// Serves repeated identical requests from the response cache.
///
/// Sits outermost, so a cache hit touches neither the gate nor the breaker.
pub struct CachedProvider {
    inner: Arc<dyn Provider>,
    cache: Arc<ResponseCache>,
}

impl CachedProvider {
    pub fn new(inner: Arc<dyn Provider>, cache: Arc<ResponseCache>) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl Provider for CachedProvider {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn search(&self, request: &SearchRequest, ctx: &CallContext) -> Result<Vec<PriceQuote>> {
        let key = key::single_origin(SEARCH_OPERATION, request);
        self.cache
            .get_or_compute(&key, ctx.bypass_cache, || self.inner.search(request, ctx))
            .await
    }
}
