//! Address geocoding with a persisted cache
//!
//! The cache is keyed by the exact resolved address string. The text sent to
//! the service is a normalized form of it (see [`normalize_query`]). Only
//! found coordinates are cached, so misses are retried on the next run.

use super::cache_store::GeocodeCache;
use super::lookup::LookupError;
use super::throttle::PostCallDelay;
use crate::models::GeoCoordinate;
use async_trait::async_trait;
use std::sync::Arc;

/// Free-text geocoding capability
///
/// `Ok(None)` means the service answered but had no usable point.
#[async_trait]
pub trait GeocodeLookup: Send + Sync {
    async fn search(&self, query: &str) -> Result<Option<GeoCoordinate>, LookupError>;
}

/// Counters for the end-of-run summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeocodeStats {
    /// Cache misses sent to the service
    pub lookups: usize,
    pub cache_hits: usize,
    /// Lookups that produced no coordinate (not found or failed)
    pub misses: usize,
}

/// Search text for an address: ASCII punctuation removed, whitespace collapsed
pub fn normalize_query(address: &str) -> String {
    address
        .chars()
        .map(|c| if c.is_ascii_punctuation() { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Memoizing geocoder
pub struct Geocoder {
    lookup: Arc<dyn GeocodeLookup>,
    cache: GeocodeCache,
    delay: PostCallDelay,
    stats: GeocodeStats,
}

impl Geocoder {
    pub fn new(lookup: Arc<dyn GeocodeLookup>, cache: GeocodeCache, delay: PostCallDelay) -> Self {
        Self {
            lookup,
            cache,
            delay,
            stats: GeocodeStats::default(),
        }
    }

    /// Coordinate for an address, from cache or one service call
    ///
    /// An address that normalizes to nothing is a miss without a call.
    pub async fn geocode(&mut self, address: &str) -> Option<GeoCoordinate> {
        if let Some(coordinate) = self.cache.get(address) {
            self.stats.cache_hits += 1;
            return Some(*coordinate);
        }

        let query = normalize_query(address);
        if query.is_empty() {
            self.stats.misses += 1;
            tracing::debug!(address = %address, "Address has no searchable text");
            return None;
        }

        self.stats.lookups += 1;

        let result = match self.lookup.search(&query).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(query = %query, error = %e, "Geocode lookup failed");
                None
            }
        };

        match result {
            Some(coordinate) => {
                self.cache.insert(address.to_string(), coordinate);
            }
            None => {
                self.stats.misses += 1;
                tracing::debug!(address = %address, "No coordinate for address");
            }
        }

        self.delay.wait().await;
        result
    }

    pub fn stats(&self) -> GeocodeStats {
        self.stats
    }

    pub fn cache(&self) -> &GeocodeCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut GeocodeCache {
        &mut self.cache
    }
}
