//! The outbound provider abstraction.
//!
//! Everything provider-specific (wire formats, OAuth, query construction)
//! lives behind [`Provider`]; the engine only sees normalized requests and
//! [`PriceQuote`] lists. The protection and caching layers implement the same
//! trait and wrap an inner provider, so the full stack composes as
//! cache → gate → resilience → network.

pub mod fixture;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::model::{PriceQuote, SearchRequest};
use crate::Result;

pub use fixture::FixtureProvider;

/// Per-call ambient state threaded through every layer of the stack.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    /// Cancelling this token aborts in-flight provider calls and queue waits.
    pub cancel: CancellationToken,
    /// Derived from an inbound no-cache directive; skips cache read and write.
    pub bypass_cache: bool,
}

impl CallContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_bypass_cache(mut self, bypass: bool) -> Self {
        self.bypass_cache = bypass;
        self
    }
}

/// A flight-pricing backend: given a normalized single-origin request,
/// asynchronously returns the cheapest quote per reachable destination.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Prices destinations for one origin.
    ///
    /// Implementations should observe `ctx.cancel` and fail with
    /// [`crate::Error::Cancelled`] once it trips.
    async fn search(&self, request: &SearchRequest, ctx: &CallContext) -> Result<Vec<PriceQuote>>;
}
