//! TTL-bounded in-process store for provider responses.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;

use crate::cache::key::CacheKey;
use crate::config::CacheConfig;
use crate::model::PriceQuote;
use crate::Result;

#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub stores: u64,
}

struct CacheEntry {
    quotes: Vec<PriceQuote>,
    expires_at: Instant,
}

/// Memoizes successful provider responses per normalized request key.
///
/// Only successful computations are stored; errors always propagate uncached.
/// Concurrent misses for the same key may both compute and overwrite; there
/// is no single-flight de-duplication.
pub struct ResponseCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
    enabled: bool,
    hits: AtomicU64,
    misses: AtomicU64,
    stores: AtomicU64,
}

impl ResponseCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: DashMap::new(),
            ttl: config.ttl,
            enabled: config.enabled,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            stores: AtomicU64::new(0),
        }
    }

    /// Return the cached value for `key`, or run `compute` and store its
    /// successful result for the configured TTL.
    ///
    /// `bypass` (an inbound no-cache directive) skips both the read and the
    /// write, as does a disabled cache.
    pub async fn get_or_compute<F, Fut>(
        &self,
        key: &CacheKey,
        bypass: bool,
        compute: F,
    ) -> Result<Vec<PriceQuote>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<PriceQuote>>>,
    {
        if !self.enabled || bypass {
            tracing::debug!(%key, "cache bypassed");
            return compute().await;
        }

        let now = Instant::now();
        if let Some(entry) = self.entries.get(key.as_str()) {
            if entry.expires_at > now {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::info!(%key, "cache hit");
                return Ok(entry.quotes.clone());
            }
        }
        // Drop the expired entry (if any) before recomputing.
        self.entries
            .remove_if(key.as_str(), |_, entry| entry.expires_at <= now);

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(%key, "cache miss");

        let quotes = compute().await?;
        self.entries.insert(
            key.as_str().to_string(),
            CacheEntry {
                quotes: quotes.clone(),
                expires_at: Instant::now() + self.ttl,
            },
        );
        self.stores.fetch_add(1, Ordering::Relaxed);
        Ok(quotes)
    }

    /// Drop all expired entries. Expiry is otherwise lazy, per key, on read.
    pub fn purge_expired(&self) {
        let now = Instant::now();
        self.entries.retain(|_, entry| entry.expires_at > now);
    }

    /// Live (unexpired) entry count.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .iter()
            .filter(|entry| entry.expires_at > now)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            stores: self.stores.load(Ordering::Relaxed),
        }
    }
}
