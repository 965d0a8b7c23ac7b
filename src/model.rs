//! Request and result types for fare searches.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{Error, Result};

/// Narrows which destinations a search may return.
///
/// The enum makes "at most one filter kind" structural; there is no way to
/// combine a continent filter with an explicit destination list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DestinationFilter {
    /// No narrowing; the provider returns everything it prices.
    #[default]
    None,
    /// Two-letter continent code, e.g. `EU`.
    Continent(String),
    /// Two-letter country code, e.g. `FR`.
    Country(String),
    /// Explicit list of destination city codes.
    Destinations(Vec<String>),
}

/// A single-origin fare lookup against a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Three-letter departure location code.
    pub origin: String,
    pub departure_date: NaiveDate,
    /// Absent for one-way trips.
    pub return_date: Option<NaiveDate>,
    /// Three-letter currency code for all returned prices.
    pub currency: String,
    #[serde(default)]
    pub filter: DestinationFilter,
}

/// A fare lookup for a group of travelers departing from several origins on
/// the same dates. Everything but the origin set is shared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiOriginSearchRequest {
    pub origins: Vec<String>,
    pub departure_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub currency: String,
    #[serde(default)]
    pub filter: DestinationFilter,
}

impl MultiOriginSearchRequest {
    /// Derives the per-origin request for one origin, sharing all other fields.
    pub fn to_single_origin(&self, origin: &str) -> SearchRequest {
        SearchRequest {
            origin: origin.to_string(),
            departure_date: self.departure_date,
            return_date: self.return_date,
            currency: self.currency.clone(),
            filter: self.filter.clone(),
        }
    }

    /// Shape validation, run synchronously before any network activity.
    pub fn validate(&self) -> Result<()> {
        if self.origins.is_empty() {
            return Err(Error::Validation("at least one origin must be provided".into()));
        }
        for origin in &self.origins {
            if !is_location_code(origin) {
                return Err(Error::Validation(format!(
                    "invalid origin code {origin:?}: expected a 3-letter code"
                )));
            }
        }
        if !is_location_code(&self.currency) {
            return Err(Error::Validation(format!(
                "invalid currency code {:?}: expected a 3-letter code",
                self.currency
            )));
        }
        if let Some(ret) = self.return_date {
            if ret < self.departure_date {
                return Err(Error::Validation(
                    "return date must not precede the departure date".into(),
                ));
            }
        }
        if let DestinationFilter::Destinations(codes) = &self.filter {
            if codes.is_empty() {
                return Err(Error::Validation(
                    "destination list filter must not be empty".into(),
                ));
            }
            for code in codes {
                if !is_location_code(code) {
                    return Err(Error::Validation(format!(
                        "invalid destination code {code:?}: expected a 3-letter code"
                    )));
                }
            }
        }
        Ok(())
    }
}

fn is_location_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic())
}

/// One priced destination returned by a provider for one origin.
///
/// Immutable once produced; prices are fixed-point decimals, never floats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub origin: String,
    pub destination_city: String,
    pub destination_country: String,
    pub price: Decimal,
    pub currency: String,
}

/// Per-origin results of a multi-origin search, keyed by origin code.
///
/// Each list is ordered by ascending price. Origins whose lookup failed are
/// absent; they are never represented by an empty entry.
pub type OriginPriceMap = HashMap<String, Vec<PriceQuote>>;

/// A destination reachable from every origin, with aggregated pricing.
///
/// Computed per aggregation call; never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonDestination {
    pub destination_city: String,
    pub destination_country: String,
    pub currency: String,
    /// Sum of one price per origin.
    pub total_price: Decimal,
    /// Median of the same per-origin prices (even count: mean of the middle two).
    pub median_price: Decimal,
    pub per_origin_prices: HashMap<String, Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(origins: &[&str]) -> MultiOriginSearchRequest {
        MultiOriginSearchRequest {
            origins: origins.iter().map(|s| s.to_string()).collect(),
            departure_date: NaiveDate::from_ymd_opt(2026, 9, 15).unwrap(),
            return_date: None,
            currency: "USD".into(),
            filter: DestinationFilter::None,
        }
    }

    #[test]
    fn to_single_origin_shares_fields() {
        let mut multi = request(&["JFK", "SFO"]);
        multi.return_date = NaiveDate::from_ymd_opt(2026, 9, 22);
        multi.filter = DestinationFilter::Continent("EU".into());

        let single = multi.to_single_origin("SFO");
        assert_eq!(single.origin, "SFO");
        assert_eq!(single.departure_date, multi.departure_date);
        assert_eq!(single.return_date, multi.return_date);
        assert_eq!(single.currency, "USD");
        assert_eq!(single.filter, multi.filter);
    }

    #[test]
    fn validate_rejects_empty_origins() {
        assert!(matches!(
            request(&[]).validate(),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn validate_rejects_bad_codes() {
        assert!(request(&["JFKX"]).validate().is_err());
        assert!(request(&["J1K"]).validate().is_err());

        let mut bad_currency = request(&["JFK"]);
        bad_currency.currency = "DOLLARS".into();
        assert!(bad_currency.validate().is_err());
    }

    #[test]
    fn validate_rejects_inverted_dates() {
        let mut req = request(&["JFK"]);
        req.return_date = NaiveDate::from_ymd_opt(2026, 9, 1);
        assert!(req.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_destination_list() {
        let mut req = request(&["JFK"]);
        req.filter = DestinationFilter::Destinations(vec![]);
        assert!(req.validate().is_err());
    }

    #[test]
    fn validate_accepts_well_formed_request() {
        let mut req = request(&["JFK", "SFO", "LHR"]);
        req.filter = DestinationFilter::Destinations(vec!["CDG".into(), "FCO".into()]);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn filter_serializes_snake_case_and_defaults_to_none() {
        let mut req = request(&["JFK"]);
        req.filter = DestinationFilter::Continent("EU".into());
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["filter"], serde_json::json!({ "continent": "EU" }));

        // A request without a filter field deserializes to the open filter.
        let json = serde_json::json!({
            "origins": ["JFK"],
            "departure_date": "2026-09-15",
            "return_date": null,
            "currency": "USD",
        });
        let parsed: MultiOriginSearchRequest = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.filter, DestinationFilter::None);
    }
}
