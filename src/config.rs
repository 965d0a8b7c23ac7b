//! Configuration for the protection layers around provider calls.

use std::time::Duration;

/// Tuning for timeout, retry, circuit breaking and concurrency limiting.
///
/// Defaults match what the engine ships with in production; every knob has a
/// `with_*` setter for tests and embedders.
#[derive(Debug, Clone)]
pub struct ResilienceConfig {
    /// Retries after the initial attempt (transient failures only).
    pub retry_count: u32,
    /// Fixed base delay before each retry; up to 1s of uniform jitter is added.
    pub base_delay: Duration,
    /// Per-attempt deadline; exceeding it counts as a transient failure.
    pub attempt_timeout: Duration,
    /// Consecutive transient failures before the circuit opens.
    pub breaker_threshold: u32,
    /// How long an open circuit rejects calls before admitting one probe.
    pub break_duration: Duration,
    /// Maximum provider calls in flight at once.
    pub max_concurrent: usize,
    /// Callers allowed to wait for a permit; beyond this, immediate rejection.
    pub max_queued: usize,
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            retry_count: 3,
            base_delay: Duration::from_secs(2),
            attempt_timeout: Duration::from_secs(30),
            breaker_threshold: 5,
            break_duration: Duration::from_secs(30),
            max_concurrent: 10,
            max_queued: 20,
        }
    }
}

impl ResilienceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retry_count(mut self, count: u32) -> Self {
        self.retry_count = count;
        self
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    pub fn with_breaker_threshold(mut self, threshold: u32) -> Self {
        self.breaker_threshold = threshold;
        self
    }

    pub fn with_break_duration(mut self, duration: Duration) -> Self {
        self.break_duration = duration;
        self
    }

    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.max_concurrent = max;
        self
    }

    pub fn with_max_queued(mut self, max: usize) -> Self {
        self.max_queued = max;
        self
    }
}

/// Configuration for the short-lived response cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Absolute expiration applied to every stored entry.
    pub ttl: Duration,
    /// A disabled cache behaves as a permanent bypass.
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(10 * 60),
            enabled: true,
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}
