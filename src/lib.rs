//! Shipping quote pricing engine.
//!
//! The library holds the pure calculation engine ([`pricing`]) and the small
//! amount of plumbing the binary needs to serve it over HTTP.

pub mod cache;
pub mod config;
pub mod error;
pub mod pricing;
pub mod telemetry;

use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::cache::FuelRateCache;
use crate::pricing::PricingCalculator;

/// Shared state for the HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub calculator: Arc<PricingCalculator>,
    pub cache: FuelRateCache,
    pub simulated_latency: Duration,
}

impl AppState {
    pub fn new(calculator: PricingCalculator, cache: FuelRateCache) -> Self {
        Self {
            calculator: Arc::new(calculator),
            cache,
            simulated_latency: Duration::ZERO,
        }
    }

    pub fn with_simulated_latency(mut self, latency: Duration) -> Self {
        self.simulated_latency = latency;
        self
    }
}

/// Build the application router with its middleware
pub fn app(state: AppState) -> Router {
    pricing::router()
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Initialize tracing/logging
///
/// Reads `RUST_LOG`, defaulting to `info`. Can only be called once.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();
}
