//! Protection layers for outbound provider calls.
//!
//! Three cooperating pieces keep an unreliable, rate-limited provider from
//! taking the whole search down with it:
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`circuit_breaker`] | Fault isolation with a half-open probe after cooldown |
//! | [`gate`] | Bounded concurrency with a bounded FIFO wait queue |
//! | [`policy`] | Per-attempt timeout plus retry with full jitter |
//!
//! The breaker state is shared process-wide per logical endpoint and is
//! injected explicitly (an `Arc`, not a hidden global), so tests construct
//! isolated instances per case.

pub mod circuit_breaker;
pub mod gate;
pub mod policy;

pub use circuit_breaker::{CircuitBreaker, CircuitBreakerSnapshot, CircuitState};
pub use gate::{ConcurrencyGate, GatePermit};
pub use policy::ResiliencePolicy;
