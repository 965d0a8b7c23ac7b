//! # farepoint
//!
//! Resilient multi-origin flight-price retrieval and aggregation.
//!
//! Given a set of departure origins and shared travel dates, `farepoint`
//! fans out one price lookup per origin against a [`provider::Provider`],
//! intersects the reachable destinations and deterministically selects the
//! destination with the lowest combined cost for the whole group.
//!
//! Every outbound call runs through a layered protection stack:
//!
//! | Layer | Module | Protects against |
//! |-------|--------|------------------|
//! | Response cache | [`cache`] | repeated identical upstream calls |
//! | Concurrency gate | [`resilience`] | provider overload, unbounded queues |
//! | Resilience policy | [`resilience`] | hangs, transient faults, dead upstreams |
//!
//! The layers implement the same [`provider::Provider`] trait as the backend
//! they wrap; [`search::FarepointClient`] assembles the stack and exposes the
//! search and selection operations.
//!
//! ```no_run
//! use std::sync::Arc;
//! use farepoint::model::{DestinationFilter, MultiOriginSearchRequest};
//! use farepoint::provider::{CallContext, FixtureProvider};
//! use farepoint::search::FarepointClient;
//!
//! # async fn run() -> farepoint::Result<()> {
//! let client = FarepointClient::builder(Arc::new(FixtureProvider::new())).build();
//!
//! let request = MultiOriginSearchRequest {
//!     origins: vec!["JFK".into(), "SFO".into(), "LHR".into()],
//!     departure_date: "2026-09-15".parse().unwrap(),
//!     return_date: Some("2026-09-22".parse().unwrap()),
//!     currency: "USD".into(),
//!     filter: DestinationFilter::Continent("EU".into()),
//! };
//!
//! if let Some(best) = client
//!     .cheapest_common_destination(&request, &CallContext::new())
//!     .await?
//! {
//!     println!("meet in {} for {}", best.destination_city, best.total_price);
//! }
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod resilience;
pub mod search;

pub use config::{CacheConfig, ResilienceConfig};
pub use error::Error;
pub use model::{CommonDestination, MultiOriginSearchRequest, PriceQuote, SearchRequest};
pub use search::FarepointClient;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
