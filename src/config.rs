//! Runtime configuration from environment variables.
//!
//! `main` loads a `.env` file first (via dotenvy) when one is present.

use anyhow::{anyhow, Context};
use rust_decimal::Decimal;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::pricing::calculators::DEFAULT_TAX_RATE;

/// Knobs of the calculation itself
#[derive(Debug, Clone)]
pub struct PricingConfig {
    /// Tax rate applied to the taxable subtotal
    pub tax_rate: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tax_rate: DEFAULT_TAX_RATE,
        }
    }
}

/// How fuel surcharge rates are picked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuelSurchargeMode {
    /// Fresh sample for every quote
    PerRequest,
    /// One snapshot per carrier per calendar date
    Daily,
}

impl FromStr for FuelSurchargeMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "per_request" | "per-request" | "random" => Ok(FuelSurchargeMode::PerRequest),
            "daily" => Ok(FuelSurchargeMode::Daily),
            other => Err(anyhow!("unknown fuel surcharge mode '{}'", other)),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub pricing: PricingConfig,
    pub fuel_mode: FuelSurchargeMode,
    pub fuel_seed: Option<u64>,
    /// Artificial delay before answering a quote request
    pub simulated_latency: Duration,
    pub catalog_path: Option<PathBuf>,
}

impl AppConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:3001".to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a socket address")?;

        let tax_rate = match lookup("SALES_TAX_RATE") {
            Some(raw) => raw
                .trim()
                .parse::<Decimal>()
                .context("SALES_TAX_RATE must be a decimal")?,
            None => DEFAULT_TAX_RATE,
        };
        if tax_rate < Decimal::ZERO || tax_rate >= Decimal::ONE {
            anyhow::bail!("SALES_TAX_RATE must be in [0, 1), got {}", tax_rate);
        }

        let fuel_mode = match lookup("FUEL_SURCHARGE_MODE") {
            Some(raw) => raw.parse().context("FUEL_SURCHARGE_MODE")?,
            None => FuelSurchargeMode::PerRequest,
        };

        let fuel_seed = lookup("FUEL_SURCHARGE_SEED")
            .map(|raw| raw.trim().parse::<u64>())
            .transpose()
            .context("FUEL_SURCHARGE_SEED must be an unsigned integer")?;

        let latency_ms = lookup("SIMULATED_LATENCY_MS")
            .map(|raw| raw.trim().parse::<u64>())
            .transpose()
            .context("SIMULATED_LATENCY_MS must be an unsigned integer")?
            .unwrap_or(0);

        let catalog_path = lookup("CARRIER_CATALOG_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            bind_addr,
            pricing: PricingConfig { tax_rate },
            fuel_mode,
            fuel_seed,
            simulated_latency: Duration::from_millis(latency_ms),
            catalog_path,
        })
    }
}
