//! Fuel surcharge rate sources.
//!
//! Each carrier publishes a `[min, max]` fuel surcharge range; a source picks
//! the rate applied to one quote. Sources are injected into the calculator.

use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use std::sync::Mutex;

use crate::cache::FuelRateCache;

use super::catalog::CarrierInfo;
use super::calculators::round_money;

/// Picks the fuel surcharge rate for a carrier on a given date
pub trait FuelSurchargeSource: Send + Sync {
    fn surcharge_rate(&self, carrier: &CarrierInfo, date: NaiveDate) -> Decimal;
}

/// Position `t` in `[0, 1]` mapped onto the carrier's range, to 4 places
fn interpolate(carrier: &CarrierInfo, t: f64) -> Decimal {
    let span = carrier.fuel_surcharge_max - carrier.fuel_surcharge_min;
    let t = Decimal::from_f64_retain(t.clamp(0.0, 1.0)).unwrap_or(Decimal::ZERO);
    round_money(carrier.fuel_surcharge_min + span * t, 4)
}

/// Samples a fresh rate on every call.
///
/// Identical requests can therefore produce different totals.
pub struct RandomFuelSurcharge {
    rng: Mutex<StdRng>,
}

impl RandomFuelSurcharge {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reproducible sequence of samples
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomFuelSurcharge {
    fn default() -> Self {
        Self::new()
    }
}

impl FuelSurchargeSource for RandomFuelSurcharge {
    fn surcharge_rate(&self, carrier: &CarrierInfo, _date: NaiveDate) -> Decimal {
        let t = match self.rng.lock() {
            Ok(mut rng) => rng.gen::<f64>(),
            Err(poisoned) => poisoned.into_inner().gen::<f64>(),
        };
        interpolate(carrier, t)
    }
}

/// One rate per carrier per calendar date.
///
/// The rate is derived from the carrier id and the date, then cached, so the
/// same request on the same day always prices identically.
#[derive(Clone, Default)]
pub struct DailyFuelSurcharge {
    cache: FuelRateCache,
}

impl DailyFuelSurcharge {
    pub fn new(cache: FuelRateCache) -> Self {
        Self { cache }
    }

    fn seed_for(carrier_id: &str, date: NaiveDate) -> u64 {
        // FNV-1a over the id, mixed with the day number
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in carrier_id.bytes() {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        hash ^ (date.num_days_from_ce() as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15)
    }
}

impl FuelSurchargeSource for DailyFuelSurcharge {
    fn surcharge_rate(&self, carrier: &CarrierInfo, date: NaiveDate) -> Decimal {
        self.cache
            .get_or_insert_with((carrier.id.clone(), date), || {
                let mut rng = StdRng::seed_from_u64(Self::seed_for(&carrier.id, date));
                interpolate(carrier, rng.gen::<f64>())
            })
    }
}

/// Always the same position within each carrier's range (0 = min, 1 = max)
#[derive(Debug, Clone, Copy)]
pub struct FixedFuelSurcharge {
    position: f64,
}

impl FixedFuelSurcharge {
    pub fn new(position: f64) -> Self {
        Self { position }
    }

    /// Always the carrier's minimum
    pub fn minimum() -> Self {
        Self::new(0.0)
    }

    /// Always the carrier's maximum
    pub fn maximum() -> Self {
        Self::new(1.0)
    }
}

impl FuelSurchargeSource for FixedFuelSurcharge {
    fn surcharge_rate(&self, carrier: &CarrierInfo, _date: NaiveDate) -> Decimal {
        interpolate(carrier, self.position)
    }
}
