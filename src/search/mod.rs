//! The retrieval stack: protection layers, multi-origin fan-out and the
//! top-level client that wires them together.
//!
//! | Piece | Role |
//! |-------|------|
//! | [`ResilientProvider`] | gate + timeout/retry/breaker around an inner provider |
//! | [`CachedProvider`] | TTL memoization keyed on the normalized request |
//! | [`MultiOriginSearcher`] | parallel per-origin fan-out with failure isolation |
//! | [`FarepointClient`] | assembled stack plus destination selection |

mod client;
mod layers;
mod orchestrator;

pub use client::{FarepointClient, FarepointClientBuilder};
pub use layers::{CachedProvider, ResilientProvider};
pub use orchestrator::MultiOriginSearcher;
