//! HTTP handlers for the pricing engine.
//!
//! Thin adapters: deserialize, call the calculator, serialize.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::error::{AppError, Result};
use crate::AppState;

use super::catalog::CarrierInfo;
use super::models::ShipmentDetails;
use super::responses::QuoteResult;

/// Pricing API routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/quote", post(quote))
        .route("/api/carriers", get(carriers))
        .route("/api/health", get(health))
}

/// Price a shipment across every eligible carrier service
pub async fn quote(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ShipmentDetails>, JsonRejection>,
) -> Result<Json<QuoteResult>> {
    let Json(details) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    if !state.simulated_latency.is_zero() {
        tokio::time::sleep(state.simulated_latency).await;
    }

    let calculator = state.calculator.clone();
    let result = tokio::task::spawn_blocking(move || calculator.calculate_quotes(&details)).await??;
    tracing::info!(
        calculation_id = %result.calculation_metrics.calculation_id,
        zone = result.calculation_metrics.zone,
        quotes = result.calculation_metrics.quote_count,
        "Quote calculated"
    );
    Ok(Json(result))
}

/// The carrier catalog in use
pub async fn carriers(State(state): State<AppState>) -> Json<Vec<CarrierInfo>> {
    Json(state.calculator.catalog().carriers().to_vec())
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "fuelRateCache": state.cache.stats(),
    }))
}
