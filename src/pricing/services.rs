//! Quote calculation service.
//!
//! [`PricingCalculator`] turns a [`ShipmentDetails`] into priced options for
//! every eligible carrier service. It is stateless between calls: the catalog,
//! fuel surcharge source and tracer are injected at construction and only
//! read afterwards.

use chrono::{Local, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::config::PricingConfig;
use crate::telemetry::{LogLevel, NoopTracer, Tracer};

use super::calculators::{
    base_rate, billable_weight, carbon_footprint, delivery_confirmation_fee, dimensional_weight,
    estimated_delivery, insurance_fee, location_surcharge, round_currency, round_money,
    special_handling_fees, taxes, to_decimal,
};
use super::catalog::{CarrierCatalog, CarrierInfo, CarrierService, ServiceMatch, StaticCatalog};
use super::fuel::{FuelSurchargeSource, RandomFuelSurcharge};
use super::geography::{get_shipping_zone, get_zone_multiplier, is_zone_valid_for_service, resolve_distance};
use super::models::ShipmentDetails;
use super::responses::{
    CalculationBasis, CalculationMetrics, CalculationTimings, CategorizedQuotes, PricingBreakdown,
    PricingOption, QuoteResult,
};
use super::validation::{validate_shipment, ValidationError};

/// Errors that abort a whole calculation
#[derive(Debug, Clone, thiserror::Error)]
pub enum QuoteError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("No shipping services available for {billable_weight} lb in zone {zone}")]
    NoServiceAvailable { billable_weight: f64, zone: u8 },
}

/// Failure pricing a single carrier service; the service is skipped
#[derive(Debug, Clone, thiserror::Error)]
pub enum ServiceQuoteError {
    #[error("{carrier} {service} does not offer signature confirmation")]
    SignatureUnavailable { carrier: String, service: String },

    #[error("{what} is not a finite number")]
    InvalidQuantity { what: &'static str },

    #[error("{what} overflowed")]
    Overflow { what: &'static str },
}

/// Resolved shipment facts shared by every service quote of one calculation
#[derive(Debug, Clone, Copy)]
pub struct QuoteContext {
    pub distance: f64,
    pub zone: u8,
    pub billable_weight: f64,
    pub dimensional_weight: f64,
    pub today: NaiveDate,
}

fn ms_since(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Shipping quote calculator
pub struct PricingCalculator {
    catalog: Arc<dyn CarrierCatalog>,
    fuel: Arc<dyn FuelSurchargeSource>,
    tracer: Arc<dyn Tracer>,
    config: PricingConfig,
}

impl PricingCalculator {
    pub fn new(
        catalog: Arc<dyn CarrierCatalog>,
        fuel: Arc<dyn FuelSurchargeSource>,
        tracer: Arc<dyn Tracer>,
        config: PricingConfig,
    ) -> Self {
        Self {
            catalog,
            fuel,
            tracer,
            config,
        }
    }

    /// Built-in catalog, per-request fuel sampling, no tracing
    pub fn with_defaults() -> Self {
        Self::new(
            Arc::new(StaticCatalog::standard()),
            Arc::new(RandomFuelSurcharge::new()),
            Arc::new(NoopTracer),
            PricingConfig::default(),
        )
    }

    pub fn catalog(&self) -> &dyn CarrierCatalog {
        self.catalog.as_ref()
    }

    /// Quote a shipment as of today
    pub fn calculate_quotes(&self, details: &ShipmentDetails) -> Result<QuoteResult, QuoteError> {
        self.calculate_quotes_on(details, Local::now().date_naive())
    }

    /// Quote a shipment as if requested on `today`
    pub fn calculate_quotes_on(
        &self,
        details: &ShipmentDetails,
        today: NaiveDate,
    ) -> Result<QuoteResult, QuoteError> {
        let span = self.tracer.start_span(
            "calculate_quotes",
            json!({
                "origin": details.origin.postal_code,
                "destination": details.destination.postal_code,
                "packageType": details.package.package_type.as_str(),
            }),
        );
        let result = self.run(details, today);
        self.tracer.end_span(span);

        if let Err(e) = &result {
            self.tracer.log(
                LogLevel::Warn,
                "quote_calculation_failed",
                json!({ "error": e.to_string() }),
            );
        }
        result
    }

    fn run(&self, details: &ShipmentDetails, today: NaiveDate) -> Result<QuoteResult, QuoteError> {
        let started = Instant::now();
        let mut timings = CalculationTimings::default();

        // 1. Validation
        let mut warnings = validate_shipment(details)?;
        timings.validation_ms = ms_since(started);

        // 2. Distance, zone, billable weight
        let geo_started = Instant::now();
        let resolution = resolve_distance(
            &details.origin.postal_code,
            &details.destination.postal_code,
        );
        if resolution.is_estimate() {
            warnings.push(format!(
                "Could not locate postal codes {} and {}; distance estimated at {} miles",
                details.origin.postal_code, details.destination.postal_code, resolution.miles
            ));
        }
        let distance = resolution.miles;
        let zone = get_shipping_zone(distance);
        let zone_multiplier = get_zone_multiplier(zone);

        let actual_weight = details.package.weight.in_pounds();
        let (l, w, h) = details.package.dimensions.in_inches();
        let dim_weight = dimensional_weight(l, w, h);
        let billable = billable_weight(actual_weight, dim_weight);
        if dim_weight > actual_weight {
            warnings.push(format!(
                "Billed on dimensional weight of {:.1} lb (actual {:.1} lb)",
                dim_weight, actual_weight
            ));
        }
        timings.geography_ms = ms_since(geo_started);

        self.tracer.log(
            LogLevel::Debug,
            "shipment_resolved",
            json!({
                "distance": distance,
                "distanceMethod": resolution.method,
                "zone": zone,
                "billableWeight": billable,
            }),
        );

        // 3. Eligible services
        let candidates = self.eligible_services(details, billable, zone, &mut warnings);
        if candidates.is_empty() {
            return Err(QuoteError::NoServiceAvailable {
                billable_weight: billable,
                zone,
            });
        }

        // 4. One quote per service; failures are dropped with a warning
        let pricing_started = Instant::now();
        let ctx = QuoteContext {
            distance,
            zone,
            billable_weight: billable,
            dimensional_weight: dim_weight,
            today,
        };
        let services_evaluated = candidates.len();
        let mut options = Vec::with_capacity(services_evaluated);
        let mut failed_count = 0;
        for m in candidates {
            match self.calculate_service_quote(details, m.carrier, m.service, &ctx) {
                Ok(option) => options.push(option),
                Err(e) => {
                    failed_count += 1;
                    self.tracer.log(
                        LogLevel::Error,
                        "service_quote_failed",
                        json!({
                            "carrier": m.carrier.id,
                            "service": m.service.id,
                            "error": e.to_string(),
                        }),
                    );
                    warnings.push(format!("{} unavailable: {}", m.service.name, e));
                }
            }
        }
        timings.pricing_ms = ms_since(pricing_started);

        // 5. Categorize and sort
        let quotes = CategorizedQuotes::from_options(options);
        timings.total_ms = ms_since(started);

        let calculation_metrics = CalculationMetrics {
            calculation_id: Uuid::new_v4(),
            calculated_at: Utc::now(),
            distance,
            distance_method: resolution.method,
            zone,
            zone_multiplier,
            actual_weight,
            dimensional_weight: dim_weight,
            billable_weight: billable,
            services_evaluated,
            quote_count: quotes.len(),
            failed_count,
            timings,
        };

        self.tracer.log(
            LogLevel::Info,
            "quotes_calculated",
            json!({
                "calculationId": calculation_metrics.calculation_id,
                "zone": zone,
                "quoteCount": calculation_metrics.quote_count,
                "failedCount": failed_count,
                "totalMs": calculation_metrics.timings.total_ms,
            }),
        );

        Ok(QuoteResult {
            quotes,
            calculation_metrics,
            warnings,
        })
    }

    /// Catalog enumeration plus the service-level hint and zone restrictions
    fn eligible_services(
        &self,
        details: &ShipmentDetails,
        billable: f64,
        zone: u8,
        warnings: &mut Vec<String>,
    ) -> Vec<ServiceMatch<'_>> {
        let hint = details.delivery_preferences.service_level;
        let mut candidates = self.catalog.get_available_services(billable, zone, hint);

        if candidates.is_empty() {
            if let Some(category) = hint {
                warnings.push(format!(
                    "No {} services available for this shipment; showing all service levels",
                    category
                ));
                candidates = self.catalog.get_available_services(billable, zone, None);
            }
        }

        candidates.retain(|m| {
            let valid = is_zone_valid_for_service(zone, &m.service.id);
            if !valid {
                warnings.push(format!(
                    "{} is not offered in zone {}",
                    m.service.name, zone
                ));
            }
            valid
        });
        candidates
    }

    /// Price one carrier service for a resolved shipment
    pub fn calculate_service_quote(
        &self,
        details: &ShipmentDetails,
        carrier: &CarrierInfo,
        service: &CarrierService,
        ctx: &QuoteContext,
    ) -> Result<PricingOption, ServiceQuoteError> {
        let span = self.tracer.start_span(
            "service_quote",
            json!({ "carrier": carrier.id, "service": service.id }),
        );
        let result = self.price_service(details, carrier, service, ctx);
        self.tracer.end_span(span);
        result
    }

    fn price_service(
        &self,
        details: &ShipmentDetails,
        carrier: &CarrierInfo,
        service: &CarrierService,
        ctx: &QuoteContext,
    ) -> Result<PricingOption, ServiceQuoteError> {
        let prefs = &details.delivery_preferences;
        let package = &details.package;

        if (prefs.signature_required || prefs.adult_signature_required) && !service.signature_available {
            return Err(ServiceQuoteError::SignatureUnavailable {
                carrier: carrier.name.clone(),
                service: service.name.clone(),
            });
        }

        let weight = to_decimal(ctx.billable_weight)
            .ok_or(ServiceQuoteError::InvalidQuantity { what: "billable weight" })?;
        let distance = to_decimal(ctx.distance)
            .ok_or(ServiceQuoteError::InvalidQuantity { what: "distance" })?;

        let base = base_rate(weight, distance, get_zone_multiplier(ctx.zone), package.package_type);
        let adjusted_rate = base
            .checked_mul(carrier.base_price_multiplier)
            .and_then(|v| v.checked_mul(service.speed_multiplier))
            .and_then(|v| v.checked_mul(Decimal::ONE + service.reliability_bonus))
            .ok_or(ServiceQuoteError::Overflow { what: "adjusted rate" })?;

        let fuel_rate = self.fuel.surcharge_rate(carrier, ctx.today);
        let fuel_surcharge = adjusted_rate
            .checked_mul(fuel_rate)
            .ok_or(ServiceQuoteError::Overflow { what: "fuel surcharge" })?;

        // Services without carrier insurance carry no insurance charge
        let (insurance, insurance_rate) = if service.insurance_available {
            insurance_fee(package.declared_value.amount)
        } else {
            (Decimal::ZERO, Decimal::ZERO)
        };
        let location = location_surcharge(details.origin.is_residential, details.destination.is_residential);
        let handling = special_handling_fees(&package.special_handling);
        let confirmation = delivery_confirmation_fee(
            prefs.signature_required,
            prefs.adult_signature_required,
            service.guaranteed_delivery,
        );

        // Round each component first so the total is their exact sum
        let base_rate = round_currency(adjusted_rate);
        let fuel_surcharge = round_currency(fuel_surcharge);
        let location = round_currency(location);
        let insurance = round_currency(insurance);
        let special_handling = round_currency(handling) + location;
        let delivery_confirmation = round_currency(confirmation);

        let taxable_subtotal = base_rate + fuel_surcharge + location;
        let (tax, tax_rate) = taxes(taxable_subtotal, self.config.tax_rate);
        let taxes = round_currency(tax);

        let total = base_rate + fuel_surcharge + insurance + special_handling + delivery_confirmation + taxes;

        let carbon = carbon_footprint(ctx.billable_weight, ctx.distance, service.carbon_footprint_multiplier);

        self.tracer.log(
            LogLevel::Debug,
            "service_quote_calculated",
            json!({
                "carrier": carrier.id,
                "service": service.id,
                "total": total.to_string(),
            }),
        );

        Ok(PricingOption {
            id: format!("{}-{}", carrier.id, service.id),
            category: service.category,
            service_type: service.name.clone(),
            carrier: carrier.name.clone(),
            pricing: PricingBreakdown {
                base_rate,
                fuel_surcharge,
                fuel_surcharge_percent: round_money(fuel_rate * Decimal::ONE_HUNDRED, 2),
                insurance,
                insurance_percent: round_money(insurance_rate * Decimal::ONE_HUNDRED, 2),
                special_handling,
                delivery_confirmation,
                taxes,
                tax_percent: round_money(tax_rate * Decimal::ONE_HUNDRED, 2),
                total,
                calculation_basis: CalculationBasis {
                    distance: ctx.distance,
                    weight: ctx.billable_weight,
                    dimensional_weight: (ctx.dimensional_weight * 100.0).round() / 100.0,
                    zone: ctx.zone,
                },
            },
            estimated_delivery: estimated_delivery(ctx.today, service.min_transit_days, service.max_transit_days),
            transit_days: service.max_transit_days,
            features: service.features.clone(),
            carbon_footprint: carbon.is_finite().then_some(carbon),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::fuel::FixedFuelSurcharge;
    use crate::pricing::models::*;
    use crate::telemetry::testing::RecordingTracer;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        // A Monday
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn calculator_with(tracer: Arc<dyn Tracer>) -> PricingCalculator {
        PricingCalculator::new(
            Arc::new(StaticCatalog::standard()),
            Arc::new(FixedFuelSurcharge::minimum()),
            tracer,
            PricingConfig::default(),
        )
    }

    fn calculator() -> PricingCalculator {
        calculator_with(Arc::new(NoopTracer))
    }

    fn shipment(origin: &str, destination: &str, weight_lbs: f64) -> ShipmentDetails {
        ShipmentDetails {
            origin: Address {
                street: "1 Main St".to_string(),
                city: "Origin".to_string(),
                state: "NY".to_string(),
                postal_code: origin.to_string(),
                country: "US".to_string(),
                is_residential: false,
            },
            destination: Address {
                street: "2 Main St".to_string(),
                city: "Destination".to_string(),
                state: "CA".to_string(),
                postal_code: destination.to_string(),
                country: "US".to_string(),
                is_residential: false,
            },
            package: Package {
                package_type: PackageType::Box,
                dimensions: Dimensions {
                    length: 10.0,
                    width: 8.0,
                    height: 6.0,
                    unit: DimensionUnit::In,
                },
                weight: Weight { value: weight_lbs, unit: WeightUnit::Lb },
                declared_value: DeclaredValue {
                    amount: dec!(100),
                    currency: "USD".to_string(),
                },
                contents: "Electronics".to_string(),
                special_handling: vec![],
            },
            delivery_preferences: DeliveryPreferences::default(),
        }
    }

    fn ups_ground() -> (CarrierInfo, CarrierService) {
        let catalog = StaticCatalog::standard();
        let carrier = catalog.carriers().iter().find(|c| c.id == "ups").cloned().unwrap();
        let service = carrier.services.iter().find(|s| s.id == "ground").cloned().unwrap();
        (carrier, service)
    }

    #[test]
    fn test_service_quote_breakdown() {
        let (carrier, service) = ups_ground();
        let details = shipment("10001", "10001", 5.0);
        let ctx = QuoteContext {
            distance: 100.0,
            zone: 1,
            billable_weight: 5.0,
            dimensional_weight: 3.45,
            today: today(),
        };

        let option = calculator()
            .calculate_service_quote(&details, &carrier, &service, &ctx)
            .unwrap();
        let p = &option.pricing;

        // base (10 + 2.75 + 1.2) * 1.0 = 13.95; * 1.00 * 1.0 * 1.02 = 14.229
        assert_eq!(p.base_rate, dec!(14.23));
        // 14.229 * 0.11 = 1.56519
        assert_eq!(p.fuel_surcharge, dec!(1.57));
        assert_eq!(p.fuel_surcharge_percent, dec!(11));
        assert_eq!(p.insurance, dec!(0));
        assert_eq!(p.special_handling, dec!(0));
        assert_eq!(p.delivery_confirmation, dec!(0));
        // (14.23 + 1.57) * 0.085 = 1.343
        assert_eq!(p.taxes, dec!(1.34));
        assert_eq!(p.tax_percent, dec!(8.5));
        assert_eq!(p.total, dec!(17.14));
        assert_eq!(p.total, p.component_sum());

        assert_eq!(option.id, "ups-ground");
        assert_eq!(option.carrier, "UPS");
        assert_eq!(option.transit_days, 5);
        assert_eq!(option.estimated_delivery, "Mon, Jan 8 (1-5 business days)");
        assert!(option.carbon_footprint.is_some());
    }

    #[test]
    fn test_location_surcharge_is_taxed_and_counted_once() {
        let (carrier, service) = ups_ground();
        let mut details = shipment("10001", "10001", 5.0);
        details.origin.is_residential = true;
        details.destination.is_residential = true;
        details.package.special_handling = vec![SpecialHandling::Fragile];
        let ctx = QuoteContext {
            distance: 100.0,
            zone: 1,
            billable_weight: 5.0,
            dimensional_weight: 3.45,
            today: today(),
        };

        let p = calculator()
            .calculate_service_quote(&details, &carrier, &service, &ctx)
            .unwrap()
            .pricing;

        // fragile 15.00 + residential 4.50 + 5.25
        assert_eq!(p.special_handling, dec!(24.75));
        // (14.23 + 1.57 + 9.75) * 0.085 = 2.17175
        assert_eq!(p.taxes, dec!(2.17));
        assert_eq!(p.total, dec!(14.23) + dec!(1.57) + dec!(24.75) + dec!(2.17));
        assert_eq!(p.total, p.component_sum());
    }

    #[test]
    fn test_uninsured_service_charges_no_insurance() {
        let catalog = StaticCatalog::standard();
        let dhl = catalog.carriers().iter().find(|c| c.id == "dhl").unwrap();
        let ground = dhl.services.iter().find(|s| s.id == "ground").unwrap();
        let express = dhl.services.iter().find(|s| s.id == "express").unwrap();
        let mut details = shipment("10001", "90210", 5.0);
        details.package.declared_value.amount = dec!(2000);
        let ctx = QuoteContext {
            distance: 2453.0,
            zone: 8,
            billable_weight: 5.0,
            dimensional_weight: 3.45,
            today: today(),
        };

        let uninsured = calculator()
            .calculate_service_quote(&details, dhl, ground, &ctx)
            .unwrap();
        assert_eq!(uninsured.pricing.insurance, dec!(0));
        assert_eq!(uninsured.pricing.insurance_percent, dec!(0));
        assert_eq!(uninsured.pricing.total, uninsured.pricing.component_sum());

        // 2000 * 0.015
        let insured = calculator()
            .calculate_service_quote(&details, dhl, express, &ctx)
            .unwrap();
        assert_eq!(insured.pricing.insurance, dec!(30.00));
        assert_eq!(insured.pricing.insurance_percent, dec!(1.5));
    }

    #[test]
    fn test_signature_on_unsupported_service_fails() {
        let catalog = StaticCatalog::standard();
        let dhl = catalog.carriers().iter().find(|c| c.id == "dhl").unwrap();
        let ground = dhl.services.iter().find(|s| s.id == "ground").unwrap();
        let mut details = shipment("10001", "90210", 5.0);
        details.delivery_preferences.signature_required = true;
        let ctx = QuoteContext {
            distance: 2453.0,
            zone: 8,
            billable_weight: 5.0,
            dimensional_weight: 3.45,
            today: today(),
        };

        let err = calculator()
            .calculate_service_quote(&details, dhl, ground, &ctx)
            .unwrap_err();
        assert!(matches!(err, ServiceQuoteError::SignatureUnavailable { .. }));
    }

    #[test]
    fn test_non_finite_distance_fails_the_service() {
        let (carrier, service) = ups_ground();
        let ctx = QuoteContext {
            distance: f64::NAN,
            zone: 1,
            billable_weight: 5.0,
            dimensional_weight: 0.0,
            today: today(),
        };
        let err = calculator()
            .calculate_service_quote(&shipment("10001", "10001", 5.0), &carrier, &service, &ctx)
            .unwrap_err();
        assert!(matches!(err, ServiceQuoteError::InvalidQuantity { what: "distance" }));
    }

    #[test]
    fn test_coast_to_coast_quotes() {
        let result = calculator()
            .calculate_quotes_on(&shipment("10001", "90210", 5.0), today())
            .unwrap();

        let metrics = &result.calculation_metrics;
        assert_eq!(metrics.zone, 8);
        assert_eq!(metrics.billable_weight, 5.0);
        assert_eq!(metrics.failed_count, 0);
        assert_eq!(metrics.quote_count, result.quotes.len());

        let expected = StaticCatalog::standard().get_available_services(5.0, 8, None).len();
        assert_eq!(result.quotes.len(), expected);
        assert!(result.quotes.freight.is_empty());
        assert!(result.quotes.iter().all(|o| o.pricing.calculation_basis.zone == 8));
        assert!(result.quotes.iter().all(|o| !o.id.ends_with("overnight")));
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    }

    #[test]
    fn test_quotes_sorted_and_balanced() {
        let result = calculator()
            .calculate_quotes_on(&shipment("60601", "98101", 12.0), today())
            .unwrap();
        for category in ServiceCategory::ALL {
            let totals: Vec<_> = result.quotes.category(category).iter().map(|o| o.pricing.total).collect();
            assert!(totals.windows(2).all(|w| w[0] <= w[1]), "{:?}", totals);
        }
        for option in result.quotes.iter() {
            assert_eq!(option.pricing.total, option.pricing.component_sum());
        }
        assert!(result.cheapest().is_some());
        assert!(result.fastest().unwrap().transit_days <= result.cheapest().unwrap().transit_days);
    }

    #[test]
    fn test_zero_declared_value_aborts() {
        let mut details = shipment("10001", "90210", 5.0);
        details.package.declared_value.amount = dec!(0);
        let err = calculator().calculate_quotes_on(&details, today()).unwrap_err();
        assert!(matches!(err, QuoteError::Validation(_)));
    }

    #[test]
    fn test_weight_beyond_every_service_aborts() {
        let mut details = shipment("10001", "90210", 25_000.0);
        details.package.package_type = PackageType::Pallet;
        details.package.dimensions = Dimensions {
            length: 48.0,
            width: 40.0,
            height: 60.0,
            unit: DimensionUnit::In,
        };
        let err = calculator().calculate_quotes_on(&details, today()).unwrap_err();
        assert!(matches!(
            err,
            QuoteError::NoServiceAvailable { zone: 8, .. }
        ));
    }

    #[test]
    fn test_service_level_hint_filters_categories() {
        let mut details = shipment("10001", "19103", 5.0);
        details.delivery_preferences.service_level = Some(ServiceCategory::Air);
        let result = calculator().calculate_quotes_on(&details, today()).unwrap();
        assert!(result.quotes.ground.is_empty());
        assert!(!result.quotes.air.is_empty());
    }

    #[test]
    fn test_unmatched_hint_falls_back_with_warning() {
        let mut details = shipment("10001", "19103", 5.0);
        details.delivery_preferences.service_level = Some(ServiceCategory::Freight);
        let result = calculator().calculate_quotes_on(&details, today()).unwrap();
        assert!(!result.quotes.ground.is_empty());
        assert!(result.warnings.iter().any(|w| w.contains("No freight services")));
    }

    #[test]
    fn test_failed_services_are_dropped_with_warnings() {
        let tracer = Arc::new(RecordingTracer::default());
        let mut details = shipment("10001", "90210", 5.0);
        details.delivery_preferences.signature_required = true;

        let result = calculator_with(tracer.clone())
            .calculate_quotes_on(&details, today())
            .unwrap();

        assert_eq!(result.calculation_metrics.failed_count, 1);
        assert!(result.quotes.iter().all(|o| o.id != "dhl-ground"));
        assert!(result.warnings.iter().any(|w| w.contains("DHL eCommerce Ground")));
        assert_eq!(tracer.events_named("service_quote_failed").len(), 1);
        assert!(tracer.spans.lock().unwrap().iter().all(|(_, ended)| *ended));
    }

    #[test]
    fn test_estimated_distance_adds_warning() {
        let result = calculator()
            .calculate_quotes_on(&shipment("12345", "12845", 5.0), today())
            .unwrap();
        assert_eq!(result.calculation_metrics.distance, 50.0);
        assert!(result.warnings.iter().any(|w| w.contains("distance estimated")));
    }

    #[test]
    fn test_same_day_offered_nearby_only() {
        let result = calculator()
            .calculate_quotes_on(&shipment("10001", "10001", 5.0), today())
            .unwrap();
        assert_eq!(result.calculation_metrics.zone, 1);
        assert!(result.quotes.iter().any(|o| o.id == "regional-same-day"));

        let result = calculator()
            .calculate_quotes_on(&shipment("10001", "60601", 5.0), today())
            .unwrap();
        assert!(result.quotes.iter().all(|o| o.id != "regional-same-day"));
    }

    #[test]
    fn test_validation_failure_is_logged() {
        let tracer = Arc::new(RecordingTracer::default());
        let mut details = shipment("10001", "90210", 5.0);
        details.package.weight.value = -1.0;
        assert!(calculator_with(tracer.clone()).calculate_quotes_on(&details, today()).is_err());
        assert_eq!(tracer.events_named("quote_calculation_failed").len(), 1);
    }
}
