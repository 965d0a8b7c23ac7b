//! Cache key construction from normalized search parameters.

use sha2::{Digest, Sha256};

use crate::model::{DestinationFilter, SearchRequest};

/// Content-addressed key over the canonical form of a request.
///
/// Order-independent inputs (destination lists) are sorted and codes are
/// uppercased before hashing, so equivalent requests collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    hash: String,
}

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.hash
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.hash)
    }
}

/// Key for a single-origin lookup under the given operation name.
pub fn single_origin(operation: &str, request: &SearchRequest) -> CacheKey {
    let canonical = canonical_form(operation, request);
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let hash = hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect();
    CacheKey { hash }
}

fn canonical_form(operation: &str, request: &SearchRequest) -> String {
    let return_date = request
        .return_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "none".to_string());
    format!(
        "{operation}:{origin}:{filter}:{departure}:{return_date}:{currency}",
        origin = request.origin.to_ascii_uppercase(),
        filter = canonical_filter(&request.filter),
        departure = request.departure_date.format("%Y-%m-%d"),
        currency = request.currency.to_ascii_uppercase(),
    )
}

fn canonical_filter(filter: &DestinationFilter) -> String {
    match filter {
        DestinationFilter::None => "filter=none".to_string(),
        DestinationFilter::Continent(code) => {
            format!("continent={}", code.to_ascii_uppercase())
        }
        DestinationFilter::Country(code) => format!("country={}", code.to_ascii_uppercase()),
        DestinationFilter::Destinations(codes) => {
            let mut codes: Vec<String> =
                codes.iter().map(|c| c.to_ascii_uppercase()).collect();
            codes.sort();
            format!("destinations={}", codes.join(","))
        }
    }
}
