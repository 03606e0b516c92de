use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use shipquote_engine::cache::FuelRateCache;
use shipquote_engine::config::{AppConfig, FuelSurchargeMode};
use shipquote_engine::pricing::{
    CarrierCatalog, DailyFuelSurcharge, FuelSurchargeSource, PricingCalculator, RandomFuelSurcharge,
    StaticCatalog,
};
use shipquote_engine::telemetry::TracingTracer;
use shipquote_engine::{app, init_tracing, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;

    let catalog = match &config.catalog_path {
        Some(path) => {
            info!("Loading carrier catalog from {}", path.display());
            StaticCatalog::from_json_file(path)
                .with_context(|| format!("loading catalog {}", path.display()))?
        }
        None => StaticCatalog::standard(),
    };
    info!("Catalog ready with {} carriers", catalog.carriers().len());

    let cache = FuelRateCache::new();
    let fuel: Arc<dyn FuelSurchargeSource> = match (config.fuel_mode, config.fuel_seed) {
        (FuelSurchargeMode::Daily, _) => Arc::new(DailyFuelSurcharge::new(cache.clone())),
        (FuelSurchargeMode::PerRequest, Some(seed)) => Arc::new(RandomFuelSurcharge::seeded(seed)),
        (FuelSurchargeMode::PerRequest, None) => Arc::new(RandomFuelSurcharge::new()),
    };
    info!("Fuel surcharge mode: {:?}", config.fuel_mode);

    let calculator = PricingCalculator::new(
        Arc::new(catalog),
        fuel,
        Arc::new(TracingTracer::new()),
        config.pricing.clone(),
    );

    let state = AppState::new(calculator, cache).with_simulated_latency(config.simulated_latency);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
