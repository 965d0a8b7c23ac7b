//! Timeout, retry and circuit breaking around a single provider call.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio_util::sync::CancellationToken;

use super::circuit_breaker::CircuitBreaker;
use crate::config::ResilienceConfig;
use crate::{Error, Result};

/// Wraps one outbound operation with the full protection stack:
/// per-attempt timeout, retry with full jitter on transient failures, and a
/// shared circuit breaker consulted before every attempt.
pub struct ResiliencePolicy {
    retry_count: u32,
    base_delay: Duration,
    attempt_timeout: Duration,
    breaker: Arc<CircuitBreaker>,
}

impl ResiliencePolicy {
    pub fn new(config: &ResilienceConfig, breaker: Arc<CircuitBreaker>) -> Self {
        Self {
            retry_count: config.retry_count,
            base_delay: config.base_delay,
            attempt_timeout: config.attempt_timeout,
            breaker,
        }
    }

    /// Fixed base plus up to one second of uniform jitter. Deliberately not
    /// exponential; the provider's rate limiter prefers spread-out retries
    /// over synchronized doubling.
    fn retry_delay(&self) -> Duration {
        self.base_delay + Duration::from_millis(rand::thread_rng().gen_range(0..1000))
    }

    /// Run `op`, retrying transient failures up to the configured count.
    ///
    /// Every attempt is bounded by the per-attempt timeout and gated on the
    /// breaker; breaker rejections surface as [`Error::CircuitOpen`], retry
    /// exhaustion as [`Error::ProviderUnavailable`] wrapping the last
    /// transient error.
    pub async fn execute<T, F, Fut>(&self, cancel: &CancellationToken, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt: u32 = 0;
        loop {
            self.breaker.allow()?;
            if cancel.is_cancelled() {
                self.breaker.release_probe();
                return Err(Error::Cancelled);
            }

            let outcome = tokio::select! {
                _ = cancel.cancelled() => {
                    self.breaker.release_probe();
                    return Err(Error::Cancelled);
                }
                attempted = tokio::time::timeout(self.attempt_timeout, op()) => {
                    match attempted {
                        Ok(inner) => inner,
                        Err(_) => Err(Error::Timeout(self.attempt_timeout)),
                    }
                }
            };

            match outcome {
                Ok(value) => {
                    self.breaker.on_success();
                    return Ok(value);
                }
                Err(err) if err.is_transient() => {
                    self.breaker.on_failure();
                    if attempt >= self.retry_count {
                        return Err(Error::ProviderUnavailable {
                            attempts: attempt + 1,
                            source: Box::new(err),
                        });
                    }
                    attempt += 1;
                    let delay = self.retry_delay();
                    tracing::warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "transient provider failure, retrying"
                    );
                    tokio::select! {
                        _ = cancel.cancelled() => return Err(Error::Cancelled),
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
                Err(err) => {
                    // Permanent errors resolve a probe without counting
                    // against the circuit.
                    self.breaker.release_probe();
                    return Err(err);
                }
            }
        }
    }
}
