//! In-memory caching using moka
//!
//! Holds the per-day fuel surcharge snapshots. A snapshot is keyed by carrier
//! and calendar date, so entries older than a couple of days are useless and
//! expire on their own.

use chrono::NaiveDate;
use moka::sync::Cache;
use rust_decimal::Decimal;
use serde::Serialize;
use std::time::Duration;
use tracing::info;

/// Cache key for a fuel surcharge snapshot
pub type FuelRateKey = (String, NaiveDate);

/// Fuel surcharge snapshots (carrier, date) -> rate
#[derive(Clone)]
pub struct FuelRateCache {
    pub rates: Cache<FuelRateKey, Decimal>,
}

impl FuelRateCache {
    /// Create a new cache instance with configured TTLs
    pub fn new() -> Self {
        Self {
            // Enough for every carrier over a few days; 48 hour TTL
            rates: Cache::builder()
                .max_capacity(1_000)
                .time_to_live(Duration::from_secs(48 * 60 * 60))
                .build(),
        }
    }

    /// Fetch the snapshot for `key`, computing it on a miss
    pub fn get_or_insert_with(&self, key: FuelRateKey, init: impl FnOnce() -> Decimal) -> Decimal {
        self.rates.get_with(key, init)
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            fuel_rates_size: self.rates.entry_count(),
        }
    }

    /// Invalidate all snapshots
    pub fn invalidate_all(&self) {
        self.rates.invalidate_all();
        info!("Fuel rate cache invalidated");
    }
}

impl Default for FuelRateCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics for monitoring endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub fuel_rates_size: u64,
}
