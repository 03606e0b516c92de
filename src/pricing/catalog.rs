//! Carrier and service catalog.
//!
//! The catalog is read-only for the lifetime of the process and is handed to
//! the calculator as a trait object, so tests can swap in their own carriers
//! and a live rate-card source can replace the built-in table later.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::geography::MAX_ZONE;
use super::models::ServiceCategory;

/// A carrier and its offerings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarrierInfo {
    pub id: String,
    pub name: String,
    pub base_price_multiplier: Decimal,
    /// Fuel surcharge range as fractions (0.12 = 12%)
    pub fuel_surcharge_min: Decimal,
    pub fuel_surcharge_max: Decimal,
    pub max_zone: u8,
    pub services: Vec<CarrierService>,
}

/// One named service offered by a carrier
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarrierService {
    pub id: String,
    pub name: String,
    pub category: ServiceCategory,
    pub min_transit_days: u32,
    pub max_transit_days: u32,
    pub speed_multiplier: Decimal,
    pub reliability_bonus: Decimal,
    #[serde(default)]
    pub min_weight: Option<f64>,
    #[serde(default)]
    pub max_weight: Option<f64>,
    #[serde(default)]
    pub max_zone: Option<u8>,
    pub carbon_footprint_multiplier: f64,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub guaranteed_delivery: bool,
    #[serde(default)]
    pub signature_available: bool,
    #[serde(default)]
    pub insurance_available: bool,
}

impl CarrierService {
    /// Weight and service-level zone bounds
    pub fn accepts(&self, weight: f64, zone: u8) -> bool {
        if !weight.is_finite() {
            return false;
        }
        if self.min_weight.is_some_and(|min| weight < min) {
            return false;
        }
        if self.max_weight.is_some_and(|max| weight > max) {
            return false;
        }
        if self.max_zone.is_some_and(|max| zone > max) {
            return false;
        }
        true
    }
}

/// An eligible carrier/service pair
#[derive(Debug, Clone, Copy)]
pub struct ServiceMatch<'a> {
    pub carrier: &'a CarrierInfo,
    pub service: &'a CarrierService,
}

/// Read-only registry of carriers
pub trait CarrierCatalog: Send + Sync {
    fn carriers(&self) -> &[CarrierInfo];

    /// Every carrier/service pair eligible for the weight and zone,
    /// optionally restricted to one category
    fn get_available_services(
        &self,
        billable_weight: f64,
        zone: u8,
        category: Option<ServiceCategory>,
    ) -> Vec<ServiceMatch<'_>> {
        self.carriers()
            .iter()
            .filter(|carrier| carrier.max_zone >= zone)
            .flat_map(|carrier| {
                carrier
                    .services
                    .iter()
                    .filter(move |service| category.map_or(true, |c| service.category == c))
                    .filter(move |service| service.accepts(billable_weight, zone))
                    .map(move |service| ServiceMatch { carrier, service })
            })
            .collect()
    }

    /// Eligibility of a single pair. Checks the carrier zone cap and the
    /// service zone cap separately.
    fn is_service_available(&self, carrier_id: &str, service_id: &str, weight: f64, zone: u8) -> bool {
        let Some(carrier) = self.carriers().iter().find(|c| c.id == carrier_id) else {
            return false;
        };
        if zone > carrier.max_zone {
            return false;
        }
        let Some(service) = carrier.services.iter().find(|s| s.id == service_id) else {
            return false;
        };
        if service.max_zone.is_some_and(|max| zone > max) {
            return false;
        }
        service.accepts(weight, zone)
    }
}

/// Catalog errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid catalog: {0}")]
    Invalid(String),
}

/// In-process catalog backed by a fixed list
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    carriers: Vec<CarrierInfo>,
}

impl StaticCatalog {
    pub fn new(carriers: Vec<CarrierInfo>) -> Result<Self, CatalogError> {
        validate_carriers(&carriers)?;
        Ok(Self { carriers })
    }

    /// Load a catalog from a JSON array of carriers
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        let carriers: Vec<CarrierInfo> = serde_json::from_str(&raw)?;
        Self::new(carriers)
    }

    /// The built-in carrier table
    pub fn standard() -> Self {
        Self {
            carriers: standard_carriers(),
        }
    }
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl CarrierCatalog for StaticCatalog {
    fn carriers(&self) -> &[CarrierInfo] {
        &self.carriers
    }
}

fn validate_carriers(carriers: &[CarrierInfo]) -> Result<(), CatalogError> {
    for carrier in carriers {
        if carrier.fuel_surcharge_min > carrier.fuel_surcharge_max {
            return Err(CatalogError::Invalid(format!(
                "carrier {} has fuel surcharge min above max",
                carrier.id
            )));
        }
        if carrier.fuel_surcharge_min < Decimal::ZERO {
            return Err(CatalogError::Invalid(format!(
                "carrier {} has a negative fuel surcharge",
                carrier.id
            )));
        }
        if carrier.max_zone == 0 || carrier.max_zone > MAX_ZONE {
            return Err(CatalogError::Invalid(format!(
                "carrier {} max zone {} outside 1..={}",
                carrier.id, carrier.max_zone, MAX_ZONE
            )));
        }
        for service in &carrier.services {
            if service.min_transit_days > service.max_transit_days {
                return Err(CatalogError::Invalid(format!(
                    "service {}/{} has min transit days above max",
                    carrier.id, service.id
                )));
            }
            if let (Some(min), Some(max)) = (service.min_weight, service.max_weight) {
                if min > max {
                    return Err(CatalogError::Invalid(format!(
                        "service {}/{} has min weight above max",
                        carrier.id, service.id
                    )));
                }
            }
        }
    }
    Ok(())
}

struct ServiceSpec {
    id: &'static str,
    name: &'static str,
    category: ServiceCategory,
    transit: (u32, u32),
    speed: Decimal,
    reliability: Decimal,
    weight: (Option<f64>, Option<f64>),
    max_zone: Option<u8>,
    carbon: f64,
    features: &'static [&'static str],
    guaranteed: bool,
    signature: bool,
    insurance: bool,
}

impl From<ServiceSpec> for CarrierService {
    fn from(spec: ServiceSpec) -> Self {
        CarrierService {
            id: spec.id.to_string(),
            name: spec.name.to_string(),
            category: spec.category,
            min_transit_days: spec.transit.0,
            max_transit_days: spec.transit.1,
            speed_multiplier: spec.speed,
            reliability_bonus: spec.reliability,
            min_weight: spec.weight.0,
            max_weight: spec.weight.1,
            max_zone: spec.max_zone,
            carbon_footprint_multiplier: spec.carbon,
            features: spec.features.iter().map(|f| f.to_string()).collect(),
            guaranteed_delivery: spec.guaranteed,
            signature_available: spec.signature,
            insurance_available: spec.insurance,
        }
    }
}

fn carrier(
    id: &str,
    name: &str,
    multiplier: Decimal,
    fuel: (Decimal, Decimal),
    max_zone: u8,
    services: Vec<ServiceSpec>,
) -> CarrierInfo {
    CarrierInfo {
        id: id.to_string(),
        name: name.to_string(),
        base_price_multiplier: multiplier,
        fuel_surcharge_min: fuel.0,
        fuel_surcharge_max: fuel.1,
        max_zone,
        services: services.into_iter().map(CarrierService::from).collect(),
    }
}

fn standard_carriers() -> Vec<CarrierInfo> {
    use ServiceCategory::{Air, Freight, Ground};

    vec![
        carrier(
            "fedex",
            "FedEx",
            dec!(1.05),
            (dec!(0.12), dec!(0.16)),
            8,
            vec![
                ServiceSpec {
                    id: "ground",
                    name: "FedEx Ground",
                    category: Ground,
                    transit: (1, 5),
                    speed: dec!(1.0),
                    reliability: dec!(0.02),
                    weight: (None, Some(150.0)),
                    max_zone: None,
                    carbon: 1.0,
                    features: &["Tracking", "Money-back guarantee"],
                    guaranteed: false,
                    signature: true,
                    insurance: true,
                },
                ServiceSpec {
                    id: "express-saver",
                    name: "FedEx Express Saver",
                    category: Air,
                    transit: (3, 3),
                    speed: dec!(1.6),
                    reliability: dec!(0.03),
                    weight: (None, Some(150.0)),
                    max_zone: None,
                    carbon: 4.0,
                    features: &["Tracking", "Delivery by 4:30 PM"],
                    guaranteed: true,
                    signature: true,
                    insurance: true,
                },
                ServiceSpec {
                    id: "2day",
                    name: "FedEx 2Day",
                    category: Air,
                    transit: (2, 2),
                    speed: dec!(1.9),
                    reliability: dec!(0.04),
                    weight: (None, Some(150.0)),
                    max_zone: None,
                    carbon: 4.5,
                    features: &["Tracking", "Delivery by 4:30 PM"],
                    guaranteed: true,
                    signature: true,
                    insurance: true,
                },
                ServiceSpec {
                    id: "overnight",
                    name: "FedEx Priority Overnight",
                    category: Air,
                    transit: (1, 1),
                    speed: dec!(2.8),
                    reliability: dec!(0.05),
                    weight: (None, Some(150.0)),
                    max_zone: Some(6),
                    carbon: 5.5,
                    features: &["Tracking", "Delivery by 10:30 AM", "Saturday delivery"],
                    guaranteed: true,
                    signature: true,
                    insurance: true,
                },
                ServiceSpec {
                    id: "freight",
                    name: "FedEx Freight Priority",
                    category: Freight,
                    transit: (1, 5),
                    speed: dec!(1.3),
                    reliability: dec!(0.03),
                    weight: (Some(150.0), Some(20_000.0)),
                    max_zone: None,
                    carbon: 0.9,
                    features: &["Tracking", "Liftgate available", "Dock-to-dock"],
                    guaranteed: false,
                    signature: true,
                    insurance: true,
                },
            ],
        ),
        carrier(
            "ups",
            "UPS",
            dec!(1.00),
            (dec!(0.11), dec!(0.15)),
            8,
            vec![
                ServiceSpec {
                    id: "ground",
                    name: "UPS Ground",
                    category: Ground,
                    transit: (1, 5),
                    speed: dec!(1.0),
                    reliability: dec!(0.02),
                    weight: (None, Some(150.0)),
                    max_zone: None,
                    carbon: 1.0,
                    features: &["Tracking", "Day-definite delivery"],
                    guaranteed: false,
                    signature: true,
                    insurance: true,
                },
                ServiceSpec {
                    id: "3day-select",
                    name: "UPS 3 Day Select",
                    category: Air,
                    transit: (3, 3),
                    speed: dec!(1.5),
                    reliability: dec!(0.03),
                    weight: (None, Some(150.0)),
                    max_zone: None,
                    carbon: 3.5,
                    features: &["Tracking", "End of day delivery"],
                    guaranteed: true,
                    signature: true,
                    insurance: true,
                },
                ServiceSpec {
                    id: "2nd-day-air",
                    name: "UPS 2nd Day Air",
                    category: Air,
                    transit: (2, 2),
                    speed: dec!(1.85),
                    reliability: dec!(0.04),
                    weight: (None, Some(150.0)),
                    max_zone: None,
                    carbon: 4.5,
                    features: &["Tracking", "End of day delivery"],
                    guaranteed: true,
                    signature: true,
                    insurance: true,
                },
                ServiceSpec {
                    id: "overnight",
                    name: "UPS Next Day Air",
                    category: Air,
                    transit: (1, 1),
                    speed: dec!(2.7),
                    reliability: dec!(0.05),
                    weight: (None, Some(150.0)),
                    max_zone: Some(6),
                    carbon: 5.5,
                    features: &["Tracking", "Delivery by 10:30 AM"],
                    guaranteed: true,
                    signature: true,
                    insurance: true,
                },
                ServiceSpec {
                    id: "freight-ltl",
                    name: "UPS Freight LTL",
                    category: Freight,
                    transit: (2, 6),
                    speed: dec!(1.2),
                    reliability: dec!(0.02),
                    weight: (Some(150.0), Some(20_000.0)),
                    max_zone: None,
                    carbon: 0.9,
                    features: &["Tracking", "Appointment delivery"],
                    guaranteed: false,
                    signature: true,
                    insurance: true,
                },
            ],
        ),
        carrier(
            "usps",
            "USPS",
            dec!(0.85),
            (dec!(0.05), dec!(0.08)),
            8,
            vec![
                ServiceSpec {
                    id: "ground-advantage",
                    name: "USPS Ground Advantage",
                    category: Ground,
                    transit: (2, 5),
                    speed: dec!(0.95),
                    reliability: dec!(0.0),
                    weight: (None, Some(70.0)),
                    max_zone: None,
                    carbon: 0.9,
                    features: &["Tracking", "$100 insurance included"],
                    guaranteed: false,
                    signature: true,
                    insurance: true,
                },
                ServiceSpec {
                    id: "priority-mail",
                    name: "USPS Priority Mail",
                    category: Air,
                    transit: (1, 3),
                    speed: dec!(1.35),
                    reliability: dec!(0.01),
                    weight: (None, Some(70.0)),
                    max_zone: None,
                    carbon: 3.0,
                    features: &["Tracking", "Free packaging"],
                    guaranteed: false,
                    signature: true,
                    insurance: true,
                },
                ServiceSpec {
                    id: "priority-mail-express",
                    name: "USPS Priority Mail Express",
                    category: Air,
                    transit: (1, 2),
                    speed: dec!(2.2),
                    reliability: dec!(0.03),
                    weight: (None, Some(70.0)),
                    max_zone: None,
                    carbon: 5.0,
                    features: &["Tracking", "Money-back guarantee", "Sunday delivery"],
                    guaranteed: true,
                    signature: true,
                    insurance: true,
                },
            ],
        ),
        carrier(
            "dhl",
            "DHL",
            dec!(1.10),
            (dec!(0.14), dec!(0.18)),
            8,
            vec![
                ServiceSpec {
                    id: "ground",
                    name: "DHL eCommerce Ground",
                    category: Ground,
                    transit: (3, 7),
                    speed: dec!(0.9),
                    reliability: dec!(0.0),
                    weight: (None, Some(25.0)),
                    max_zone: None,
                    carbon: 0.95,
                    features: &["Tracking"],
                    guaranteed: false,
                    signature: false,
                    insurance: false,
                },
                ServiceSpec {
                    id: "express",
                    name: "DHL Express Worldwide",
                    category: Air,
                    transit: (1, 3),
                    speed: dec!(2.3),
                    reliability: dec!(0.04),
                    weight: (None, Some(150.0)),
                    max_zone: None,
                    carbon: 5.0,
                    features: &["Tracking", "Proactive notifications"],
                    guaranteed: true,
                    signature: true,
                    insurance: true,
                },
            ],
        ),
        carrier(
            "regional",
            "Regional Express",
            dec!(0.90),
            (dec!(0.08), dec!(0.10)),
            4,
            vec![
                ServiceSpec {
                    id: "ground",
                    name: "Regional Ground",
                    category: Ground,
                    transit: (1, 2),
                    speed: dec!(0.9),
                    reliability: dec!(0.01),
                    weight: (None, Some(150.0)),
                    max_zone: None,
                    carbon: 0.8,
                    features: &["Tracking", "Evening delivery"],
                    guaranteed: false,
                    signature: true,
                    insurance: true,
                },
                ServiceSpec {
                    id: "same-day",
                    name: "Regional Same Day",
                    category: Air,
                    transit: (0, 0),
                    speed: dec!(3.0),
                    reliability: dec!(0.05),
                    weight: (None, Some(50.0)),
                    max_zone: Some(2),
                    carbon: 1.5,
                    features: &["Tracking", "Courier delivery", "Live GPS"],
                    guaranteed: true,
                    signature: true,
                    insurance: true,
                },
            ],
        ),
        carrier(
            "estes",
            "Estes Freight",
            dec!(0.95),
            (dec!(0.18), dec!(0.24)),
            8,
            vec![
                ServiceSpec {
                    id: "ltl-standard",
                    name: "Estes LTL Standard",
                    category: Freight,
                    transit: (2, 7),
                    speed: dec!(1.0),
                    reliability: dec!(0.01),
                    weight: (Some(100.0), Some(20_000.0)),
                    max_zone: None,
                    carbon: 0.85,
                    features: &["Tracking", "Liftgate available", "Residential delivery"],
                    guaranteed: false,
                    signature: true,
                    insurance: true,
                },
                ServiceSpec {
                    id: "ltl-guaranteed",
                    name: "Estes Guaranteed LTL",
                    category: Freight,
                    transit: (1, 5),
                    speed: dec!(1.35),
                    reliability: dec!(0.04),
                    weight: (Some(100.0), Some(20_000.0)),
                    max_zone: None,
                    carbon: 0.9,
                    features: &["Tracking", "Guaranteed by 5 PM", "Appointment delivery"],
                    guaranteed: true,
                    signature: true,
                    insurance: true,
                },
            ],
        ),
    ]
}
