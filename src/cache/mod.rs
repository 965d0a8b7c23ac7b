//! Short-lived response cache shielding the provider from redundant traffic.
//!
//! Keys are a pure function of the normalized search parameters
//! ([`key`]); the store ([`store`]) memoizes successful provider responses
//! with absolute TTL expiry and honors an explicit per-call bypass.

pub mod key;
pub mod store;

pub use key::CacheKey;
pub use store::{CacheStats, ResponseCache};
