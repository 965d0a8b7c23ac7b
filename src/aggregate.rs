//! Deterministic selection of the optimal common destination.
//!
//! Given the per-origin price lists of a multi-origin search, intersects the
//! destination sets and picks the winner under an exact three-level ordering:
//! ascending total price, then median price, then destination code. The last
//! level makes the result independent of map iteration order.

use rust_decimal::Decimal;
use std::collections::{BTreeSet, HashMap};

use crate::model::{CommonDestination, OriginPriceMap, PriceQuote};

/// Destination codes reachable from every origin in the map.
///
/// An empty map, or any origin with an empty list, yields an empty set.
pub fn common_destinations(map: &OriginPriceMap) -> BTreeSet<String> {
    let mut origins = map.values();
    let first = match origins.next() {
        Some(quotes) => quotes,
        None => return BTreeSet::new(),
    };
    let mut common: BTreeSet<String> = first
        .iter()
        .map(|q| q.destination_city.clone())
        .collect();
    for quotes in origins {
        let codes: BTreeSet<&str> =
            quotes.iter().map(|q| q.destination_city.as_str()).collect();
        common.retain(|code| codes.contains(code.as_str()));
    }
    common
}

/// Pick the destination minimizing `(total, median, code)` across all
/// origins, or `None` when no destination is common to every origin.
///
/// An empty intersection is a normal outcome, not a fault. When an origin
/// quotes the same destination more than once, its cheapest quote counts.
pub fn select_optimal_destination(map: &OriginPriceMap) -> Option<CommonDestination> {
    let common = common_destinations(map);
    if common.is_empty() {
        return None;
    }

    // Cheapest quote per destination, per origin.
    let cheapest_by_origin: Vec<(&String, HashMap<&str, &PriceQuote>)> = map
        .iter()
        .map(|(origin, quotes)| {
            let mut cheapest: HashMap<&str, &PriceQuote> = HashMap::new();
            for quote in quotes {
                cheapest
                    .entry(quote.destination_city.as_str())
                    .and_modify(|held| {
                        if quote.price < held.price {
                            *held = quote;
                        }
                    })
                    .or_insert(quote);
            }
            (origin, cheapest)
        })
        .collect();

    let mut best: Option<CommonDestination> = None;
    for code in &common {
        let mut per_origin_prices = HashMap::with_capacity(cheapest_by_origin.len());
        let mut prices = Vec::with_capacity(cheapest_by_origin.len());
        let mut country = String::new();
        let mut currency = String::new();

        for (origin, cheapest) in &cheapest_by_origin {
            // Membership in the common set guarantees presence.
            let quote = cheapest.get(code.as_str())?;
            per_origin_prices.insert((*origin).clone(), quote.price);
            prices.push(quote.price);
            if country.is_empty() {
                country = quote.destination_country.clone();
                currency = quote.currency.clone();
            }
        }

        let candidate = CommonDestination {
            destination_city: code.clone(),
            destination_country: country,
            currency,
            total_price: prices.iter().copied().sum(),
            median_price: median(&mut prices),
            per_origin_prices,
        };

        let better = match &best {
            None => true,
            Some(current) => {
                (
                    candidate.total_price,
                    candidate.median_price,
                    &candidate.destination_city,
                ) < (
                    current.total_price,
                    current.median_price,
                    &current.destination_city,
                )
            }
        };
        if better {
            best = Some(candidate);
        }
    }
    best
}

/// Median of the given prices; for an even count, the mean of the two middle
/// values. Decimal arithmetic throughout, no floating point.
fn median(prices: &mut [Decimal]) -> Decimal {
    prices.sort();
    let n = prices.len();
    if n % 2 == 1 {
        prices[n / 2]
    } else {
        (prices[n / 2 - 1] + prices[n / 2]) / Decimal::from(2)
    }
}
