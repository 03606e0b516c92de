//! Package consistency checks run before any pricing.
//!
//! Hard failures abort the calculation with a [`ValidationError`] listing
//! every broken rule. Softer concerns come back as warnings.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::geography::validate_zip_code;
use super::models::{PackageType, ShipmentDetails, SpecialHandling};

const HIGH_VALUE_THRESHOLD: Decimal = dec!(50000);

/// Per-type physical limits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackageLimits {
    pub max_weight_lbs: f64,
    pub max_side_inches: f64,
}

pub fn package_limits(package_type: PackageType) -> PackageLimits {
    let (max_weight_lbs, max_side_inches) = match package_type {
        PackageType::Envelope => (1.0, 15.0),
        PackageType::Pak => (5.0, 20.0),
        PackageType::Tube => (50.0, 60.0),
        PackageType::Box => (150.0, 108.0),
        PackageType::Crate => (10_000.0, 144.0),
        PackageType::Pallet => (30_000.0, 120.0),
        PackageType::Custom => (30_000.0, 240.0),
    };
    PackageLimits {
        max_weight_lbs,
        max_side_inches,
    }
}

/// Inconsistent shipment data
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}: {}", .errors.join("; "))]
pub struct ValidationError {
    pub message: String,
    pub errors: Vec<String>,
}

/// Validate the shipment, returning non-fatal warnings on success
pub fn validate_shipment(details: &ShipmentDetails) -> Result<Vec<String>, ValidationError> {
    let package = &details.package;
    let limits = package_limits(package.package_type);
    let type_name = package.package_type.as_str();

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if package.declared_value.amount <= Decimal::ZERO {
        errors.push("declared value must be greater than zero".to_string());
    }

    let weight = package.weight.in_pounds();
    if !weight.is_finite() || weight <= 0.0 {
        errors.push("weight must be greater than zero".to_string());
    } else if weight > limits.max_weight_lbs {
        errors.push(format!(
            "weight {:.1} lb exceeds the {} limit of {} lb",
            weight, type_name, limits.max_weight_lbs
        ));
    }

    let (l, w, h) = package.dimensions.in_inches();
    if [l, w, h].iter().any(|d| !d.is_finite() || *d <= 0.0) {
        errors.push("dimensions must all be greater than zero".to_string());
    } else {
        let longest = package.dimensions.longest_side_inches();
        if longest > limits.max_side_inches {
            errors.push(format!(
                "longest side {:.1} in exceeds the {} limit of {} in",
                longest, type_name, limits.max_side_inches
            ));
        }
    }

    if !errors.is_empty() {
        return Err(ValidationError {
            message: "Invalid package details".to_string(),
            errors,
        });
    }

    for (label, address) in [("origin", &details.origin), ("destination", &details.destination)] {
        if !validate_zip_code(&address.postal_code, &address.country) {
            warnings.push(format!(
                "{} postal code '{}' is not a valid {} format; distance may be estimated",
                label, address.postal_code, address.country
            ));
        }
    }

    if package.contents.trim().is_empty() {
        warnings.push("package contents not described".to_string());
    }
    if package.declared_value.amount > HIGH_VALUE_THRESHOLD {
        warnings.push(format!(
            "declared value {} {} exceeds {}; additional coverage may be required",
            package.declared_value.amount, package.declared_value.currency, HIGH_VALUE_THRESHOLD
        ));
    }
    if package.special_handling.contains(&SpecialHandling::Hazmat) {
        warnings.push("hazardous materials require carrier approval before pickup".to_string());
    }
    if package.package_type.is_freight() && details.destination.is_residential {
        warnings.push(format!(
            "residential delivery of a {} may require a liftgate",
            type_name
        ));
    }

    Ok(warnings)
}
