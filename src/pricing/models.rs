//! Shipment input models.
//!
//! These are the records the quote endpoint deserializes from the UI's JSON
//! (camelCase on the wire). The engine only ever borrows them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const KG_TO_LB: f64 = 2.204_622_621_8;
const OZ_TO_LB: f64 = 1.0 / 16.0;
const CM_TO_IN: f64 = 1.0 / 2.54;

/// Full description of a shipment to be quoted
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentDetails {
    pub origin: Address,
    pub destination: Address,
    pub package: Package,
    #[serde(default)]
    pub delivery_preferences: DeliveryPreferences,
}

/// Postal address of either end of the shipment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    pub postal_code: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default)]
    pub is_residential: bool,
}

fn default_country() -> String {
    "US".to_string()
}

/// The physical package
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    #[serde(rename = "type")]
    pub package_type: PackageType,
    pub dimensions: Dimensions,
    pub weight: Weight,
    pub declared_value: DeclaredValue,
    #[serde(default)]
    pub contents: String,
    #[serde(default)]
    pub special_handling: Vec<SpecialHandling>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageType {
    Envelope,
    Pak,
    Tube,
    Box,
    Crate,
    Pallet,
    Custom,
}

impl PackageType {
    /// Lowercase identifier, as used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageType::Envelope => "envelope",
            PackageType::Pak => "pak",
            PackageType::Tube => "tube",
            PackageType::Box => "box",
            PackageType::Crate => "crate",
            PackageType::Pallet => "pallet",
            PackageType::Custom => "custom",
        }
    }

    /// Whether the package moves as palletized freight
    pub fn is_freight(&self) -> bool {
        matches!(self, PackageType::Crate | PackageType::Pallet)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub unit: DimensionUnit,
}

impl Dimensions {
    /// Length, width and height converted to inches
    pub fn in_inches(&self) -> (f64, f64, f64) {
        let factor = match self.unit {
            DimensionUnit::In => 1.0,
            DimensionUnit::Cm => CM_TO_IN,
        };
        (self.length * factor, self.width * factor, self.height * factor)
    }

    /// Longest single side, in inches
    pub fn longest_side_inches(&self) -> f64 {
        let (l, w, h) = self.in_inches();
        l.max(w).max(h)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionUnit {
    #[default]
    In,
    Cm,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Weight {
    pub value: f64,
    #[serde(default)]
    pub unit: WeightUnit,
}

impl Weight {
    /// Weight converted to pounds
    pub fn in_pounds(&self) -> f64 {
        match self.unit {
            WeightUnit::Lb => self.value,
            WeightUnit::Kg => self.value * KG_TO_LB,
            WeightUnit::Oz => self.value * OZ_TO_LB,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Lb,
    Kg,
    Oz,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeclaredValue {
    pub amount: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

/// Handling requirement tags, each billed as a flat fee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpecialHandling {
    Fragile,
    Hazmat,
    WhiteGlove,
    TemperatureControlled,
    Oversized,
    Liftgate,
    InsideDelivery,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryPreferences {
    #[serde(default)]
    pub signature_required: bool,
    #[serde(default)]
    pub adult_signature_required: bool,
    /// Preferred service category, used as a filter hint
    #[serde(default)]
    pub service_level: Option<ServiceCategory>,
}

/// Service category a carrier offering belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceCategory {
    Ground,
    Air,
    Freight,
}

impl ServiceCategory {
    pub const ALL: [ServiceCategory; 3] = [
        ServiceCategory::Ground,
        ServiceCategory::Air,
        ServiceCategory::Freight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceCategory::Ground => "ground",
            ServiceCategory::Air => "air",
            ServiceCategory::Freight => "freight",
        }
    }
}

impl std::fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
