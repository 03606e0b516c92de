//! Quote output records.
//!
//! Serialized camelCase for the pricing UI. Money goes out as strings so no
//! precision is lost on the way to the browser.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::geography::DistanceMethod;
use super::models::ServiceCategory;

/// One priced carrier service
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingOption {
    pub id: String,
    pub category: ServiceCategory,
    pub service_type: String,
    pub carrier: String,
    pub pricing: PricingBreakdown,
    pub estimated_delivery: String,
    pub transit_days: u32,
    pub features: Vec<String>,
    /// kg CO2e
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbon_footprint: Option<f64>,
}

/// Fee composition of a quote
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingBreakdown {
    #[serde(with = "rust_decimal::serde::str")]
    pub base_rate: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub fuel_surcharge: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub fuel_surcharge_percent: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub insurance: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub insurance_percent: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub special_handling: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub delivery_confirmation: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub taxes: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub tax_percent: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
    pub calculation_basis: CalculationBasis,
}

impl PricingBreakdown {
    /// Sum of the fee components
    pub fn component_sum(&self) -> Decimal {
        self.base_rate
            + self.fuel_surcharge
            + self.insurance
            + self.special_handling
            + self.delivery_confirmation
            + self.taxes
    }
}

/// Inputs a quote was priced from
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationBasis {
    pub distance: f64,
    pub weight: f64,
    pub dimensional_weight: f64,
    pub zone: u8,
}

/// Quotes grouped by category, each sorted by ascending total
#[derive(Debug, Clone, Default, Serialize)]
pub struct CategorizedQuotes {
    pub ground: Vec<PricingOption>,
    pub air: Vec<PricingOption>,
    pub freight: Vec<PricingOption>,
}

impl CategorizedQuotes {
    /// Group and sort
    pub fn from_options(options: Vec<PricingOption>) -> Self {
        let mut quotes = Self::default();
        for option in options {
            quotes.category_mut(option.category).push(option);
        }
        for category in ServiceCategory::ALL {
            quotes
                .category_mut(category)
                .sort_by(|a, b| a.pricing.total.cmp(&b.pricing.total));
        }
        quotes
    }

    pub fn category(&self, category: ServiceCategory) -> &[PricingOption] {
        match category {
            ServiceCategory::Ground => &self.ground,
            ServiceCategory::Air => &self.air,
            ServiceCategory::Freight => &self.freight,
        }
    }

    fn category_mut(&mut self, category: ServiceCategory) -> &mut Vec<PricingOption> {
        match category {
            ServiceCategory::Ground => &mut self.ground,
            ServiceCategory::Air => &mut self.air,
            ServiceCategory::Freight => &mut self.freight,
        }
    }

    pub fn len(&self) -> usize {
        self.ground.len() + self.air.len() + self.freight.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &PricingOption> {
        self.ground.iter().chain(self.air.iter()).chain(self.freight.iter())
    }
}

/// Audit data about a calculation run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationMetrics {
    pub calculation_id: Uuid,
    pub calculated_at: DateTime<Utc>,
    pub distance: f64,
    pub distance_method: DistanceMethod,
    pub zone: u8,
    #[serde(with = "rust_decimal::serde::str")]
    pub zone_multiplier: Decimal,
    pub actual_weight: f64,
    pub dimensional_weight: f64,
    pub billable_weight: f64,
    pub services_evaluated: usize,
    pub quote_count: usize,
    pub failed_count: usize,
    pub timings: CalculationTimings,
}

/// Phase timings in milliseconds
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationTimings {
    pub validation_ms: f64,
    pub geography_ms: f64,
    pub pricing_ms: f64,
    pub total_ms: f64,
}

/// Everything a successful calculation returns
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResult {
    pub quotes: CategorizedQuotes,
    pub calculation_metrics: CalculationMetrics,
    pub warnings: Vec<String>,
}

impl QuoteResult {
    /// Lowest total across all categories
    pub fn cheapest(&self) -> Option<&PricingOption> {
        self.quotes.iter().min_by(|a, b| a.pricing.total.cmp(&b.pricing.total))
    }

    /// Fewest transit days, ties broken by price
    pub fn fastest(&self) -> Option<&PricingOption> {
        self.quotes
            .iter()
            .min_by(|a, b| (a.transit_days, a.pricing.total).cmp(&(b.transit_days, b.pricing.total)))
    }
}

/// Generic pricing error response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn option(id: &str, category: ServiceCategory, total: Decimal, days: u32) -> PricingOption {
        PricingOption {
            id: id.to_string(),
            category,
            service_type: id.to_string(),
            carrier: "Test".to_string(),
            pricing: PricingBreakdown {
                base_rate: total,
                fuel_surcharge: dec!(0),
                fuel_surcharge_percent: dec!(0),
                insurance: dec!(0),
                insurance_percent: dec!(0),
                special_handling: dec!(0),
                delivery_confirmation: dec!(0),
                taxes: dec!(0),
                tax_percent: dec!(0),
                total,
                calculation_basis: CalculationBasis {
                    distance: 0.0,
                    weight: 1.0,
                    dimensional_weight: 0.0,
                    zone: 1,
                },
            },
            estimated_delivery: String::new(),
            transit_days: days,
            features: vec![],
            carbon_footprint: None,
        }
    }

    #[test]
    fn test_categorized_quotes_group_and_sort() {
        let quotes = CategorizedQuotes::from_options(vec![
            option("g2", ServiceCategory::Ground, dec!(20), 5),
            option("a1", ServiceCategory::Air, dec!(40), 1),
            option("g1", ServiceCategory::Ground, dec!(10), 4),
            option("a2", ServiceCategory::Air, dec!(35), 2),
        ]);

        assert_eq!(quotes.len(), 4);
        let ground: Vec<_> = quotes.ground.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ground, vec!["g1", "g2"]);
        let air: Vec<_> = quotes.air.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(air, vec!["a2", "a1"]);
        assert!(quotes.freight.is_empty());
    }

    #[test]
    fn test_serializes_money_as_strings() {
        let json = serde_json::to_value(option("x", ServiceCategory::Air, dec!(12.50), 1)).unwrap();
        assert_eq!(json["pricing"]["total"], "12.50");
        assert_eq!(json["serviceType"], "x");
        assert_eq!(json["pricing"]["calculationBasis"]["zone"], 1);
        assert!(json.get("carbonFootprint").is_none());
    }
}
