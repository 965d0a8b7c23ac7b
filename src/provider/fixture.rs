//! Deterministic in-memory provider for development and tests.

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::{CallContext, Provider};
use crate::model::{DestinationFilter, PriceQuote, SearchRequest};
use crate::{Error, Result};

const EUROPEAN: &[(&str, &str)] = &[
    ("CDG", "FR"),
    ("FCO", "IT"),
    ("MAD", "ES"),
    ("AMS", "NL"),
    ("ATH", "GR"),
    ("LIS", "PT"),
    ("ZRH", "CH"),
    ("VIE", "AT"),
    ("CPH", "DK"),
    ("ARN", "SE"),
    ("TXL", "DE"),
    ("DUB", "IE"),
];

/// Produces seeded per-origin price tables without any network traffic.
///
/// The same request always yields the same quotes, which makes cache and
/// aggregation behavior reproducible in tests and demos.
#[derive(Debug, Clone, Default)]
pub struct FixtureProvider;

impl FixtureProvider {
    pub fn new() -> Self {
        Self
    }

    fn destinations(filter: &DestinationFilter) -> Vec<(String, String)> {
        let owned = |list: &[(&str, &str)]| {
            list.iter()
                .map(|(city, country)| (city.to_string(), country.to_string()))
                .collect::<Vec<_>>()
        };
        match filter {
            DestinationFilter::None => owned(EUROPEAN),
            DestinationFilter::Continent(code) => match code.to_ascii_uppercase().as_str() {
                "NA" => owned(&[("JFK", "US"), ("ORD", "US"), ("YYZ", "CA"), ("MEX", "MX")]),
                "SA" => owned(&[("GRU", "BR"), ("EZE", "AR"), ("BOG", "CO"), ("SCL", "CL")]),
                "AS" => owned(&[("HND", "JP"), ("PEK", "CN"), ("SIN", "SG"), ("DEL", "IN")]),
                "AF" => owned(&[("JNB", "ZA"), ("CAI", "EG"), ("NBO", "KE"), ("LOS", "NG")]),
                "OC" => owned(&[("SYD", "AU"), ("AKL", "NZ"), ("NAN", "FJ")]),
                _ => owned(EUROPEAN),
            },
            DestinationFilter::Country(code) => {
                let code = code.to_ascii_uppercase();
                match code.as_str() {
                    "FR" => owned(&[("CDG", "FR"), ("NCE", "FR"), ("LYS", "FR"), ("MRS", "FR")]),
                    "IT" => owned(&[("FCO", "IT"), ("MXP", "IT"), ("VCE", "IT"), ("NAP", "IT")]),
                    "ES" => owned(&[("MAD", "ES"), ("BCN", "ES"), ("AGP", "ES"), ("IBZ", "ES")]),
                    "DE" => owned(&[("TXL", "DE"), ("MUC", "DE"), ("FRA", "DE"), ("DUS", "DE")]),
                    _ => EUROPEAN
                        .iter()
                        .filter(|(_, country)| *country == code)
                        .map(|(city, country)| (city.to_string(), country.to_string()))
                        .collect(),
                }
            }
            DestinationFilter::Destinations(codes) => codes
                .iter()
                .map(|code| {
                    let country = EUROPEAN
                        .iter()
                        .find(|(city, _)| city == code)
                        .map(|(_, country)| country.to_string())
                        .unwrap_or_else(|| code.chars().take(2).collect());
                    (code.clone(), country)
                })
                .collect(),
        }
    }

    fn seed_for(request: &SearchRequest) -> u64 {
        let mut hasher = DefaultHasher::new();
        request.origin.hash(&mut hasher);
        request.departure_date.hash(&mut hasher);
        request.return_date.hash(&mut hasher);
        hasher.finish()
    }
}

#[async_trait]
impl Provider for FixtureProvider {
    fn name(&self) -> &str {
        "fixture"
    }

    async fn search(&self, request: &SearchRequest, ctx: &CallContext) -> Result<Vec<PriceQuote>> {
        if ctx.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let mut rng = StdRng::seed_from_u64(Self::seed_for(request));
        let mut quotes: Vec<PriceQuote> = Self::destinations(&request.filter)
            .into_iter()
            .map(|(city, country)| {
                // Prices in the 100.00..600.00 range with two decimal places.
                let cents: i64 = rng.gen_range(10_000..60_000);
                PriceQuote {
                    origin: request.origin.clone(),
                    destination_city: city,
                    destination_country: country,
                    price: Decimal::new(cents, 2),
                    currency: request.currency.clone(),
                }
            })
            .collect();

        quotes.sort_by(|a, b| {
            a.price
                .cmp(&b.price)
                .then_with(|| a.destination_city.cmp(&b.destination_city))
        });

        tracing::debug!(
            origin = %request.origin,
            quotes = quotes.len(),
            "fixture provider generated quotes"
        );
        Ok(quotes)
    }
}
