//! Core fee calculation functions.
//!
//! Pure functions for quote math - no catalog or tracing access.
//! Money is `Decimal` throughout; physical quantities (miles, pounds) are `f64`
//! and are converted at the boundary.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::pricing::models::{PackageType, SpecialHandling};

/// Cubic inches per pound of dimensional weight
pub const DIM_DIVISOR: f64 = 139.0;

/// Default sales tax applied to the taxable subtotal
pub const DEFAULT_TAX_RATE: Decimal = dec!(0.085);

const PER_POUND_RATE: Decimal = dec!(0.55);
const PER_MILE_RATE: Decimal = dec!(0.012);

const RESIDENTIAL_ORIGIN_FEE: Decimal = dec!(4.50);
const RESIDENTIAL_DESTINATION_FEE: Decimal = dec!(5.25);

const SIGNATURE_FEE: Decimal = dec!(5.50);
const ADULT_SIGNATURE_FEE: Decimal = dec!(7.50);
const GUARANTEED_PROOF_OF_DELIVERY_FEE: Decimal = dec!(2.50);

const LB_TO_KG: f64 = 0.453_592_37;
const MILES_TO_KM: f64 = 1.609_344;
/// kg CO2e per tonne-km for the reference (ground) mode
const EMISSION_FACTOR: f64 = 0.1;

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// Banker's rounding rounds to the nearest even number when the value is exactly
/// halfway between two possibilities. This reduces cumulative rounding bias.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use shipquote_engine::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Round a currency amount to cents. Idempotent.
pub fn round_currency(amount: Decimal) -> Decimal {
    round_money(amount, 2)
}

/// Convert a physical quantity into a `Decimal`, rejecting NaN and infinities
pub fn to_decimal(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value)
}

/// Volumetric weight in pounds from dimensions in inches
pub fn dimensional_weight(length: f64, width: f64, height: f64) -> f64 {
    (length * width * height) / DIM_DIVISOR
}

/// Greater of actual and dimensional weight, rounded up to the next whole
/// pound with a 1 lb minimum.
pub fn billable_weight(actual_lbs: f64, dimensional_lbs: f64) -> f64 {
    actual_lbs.max(dimensional_lbs).ceil().max(1.0)
}

/// Flat handling charge included in every rate for the package type
pub fn package_base_fee(package_type: PackageType) -> Decimal {
    match package_type {
        PackageType::Envelope => dec!(6.50),
        PackageType::Pak => dec!(8.00),
        PackageType::Tube => dec!(9.50),
        PackageType::Box => dec!(10.00),
        PackageType::Crate => dec!(45.00),
        PackageType::Pallet => dec!(85.00),
        PackageType::Custom => dec!(25.00),
    }
}

/// Base transport rate before carrier and service adjustments.
///
/// `(type base + weight × per-lb + distance × per-mile) × zone multiplier`.
/// Monotonically increasing in weight and distance.
pub fn base_rate(
    billable_weight: Decimal,
    distance_miles: Decimal,
    zone_multiplier: Decimal,
    package_type: PackageType,
) -> Decimal {
    let raw = package_base_fee(package_type)
        + billable_weight * PER_POUND_RATE
        + distance_miles * PER_MILE_RATE;
    raw * zone_multiplier
}

/// Insurance rate for a declared value
pub fn insurance_rate(declared_value: Decimal) -> Decimal {
    if declared_value <= dec!(100) {
        Decimal::ZERO
    } else if declared_value <= dec!(1000) {
        dec!(0.010)
    } else if declared_value <= dec!(5000) {
        dec!(0.015)
    } else {
        dec!(0.020)
    }
}

/// Tiered insurance fee: (fee, rate)
pub fn insurance_fee(declared_value: Decimal) -> (Decimal, Decimal) {
    let rate = insurance_rate(declared_value);
    (declared_value * rate, rate)
}

/// Flat fee for one handling tag
pub fn handling_fee(tag: SpecialHandling) -> Decimal {
    match tag {
        SpecialHandling::Fragile => dec!(15.00),
        SpecialHandling::Hazmat => dec!(75.00),
        SpecialHandling::WhiteGlove => dec!(125.00),
        SpecialHandling::TemperatureControlled => dec!(45.00),
        SpecialHandling::Oversized => dec!(60.00),
        SpecialHandling::Liftgate => dec!(50.00),
        SpecialHandling::InsideDelivery => dec!(35.00),
    }
}

/// Sum of flat fees over all declared handling tags
pub fn special_handling_fees(tags: &[SpecialHandling]) -> Decimal {
    tags.iter().map(|t| handling_fee(*t)).sum()
}

/// Residential pickup/delivery surcharge
pub fn location_surcharge(origin_residential: bool, destination_residential: bool) -> Decimal {
    let mut fee = Decimal::ZERO;
    if origin_residential {
        fee += RESIDENTIAL_ORIGIN_FEE;
    }
    if destination_residential {
        fee += RESIDENTIAL_DESTINATION_FEE;
    }
    fee
}

/// Signature and proof-of-delivery charges
pub fn delivery_confirmation_fee(
    signature_required: bool,
    adult_signature_required: bool,
    guaranteed_delivery: bool,
) -> Decimal {
    let signature = if adult_signature_required {
        ADULT_SIGNATURE_FEE
    } else if signature_required {
        SIGNATURE_FEE
    } else {
        Decimal::ZERO
    };

    if guaranteed_delivery {
        signature + GUARANTEED_PROOF_OF_DELIVERY_FEE
    } else {
        signature
    }
}

/// Tax on the taxable subtotal: (tax, rate)
pub fn taxes(subtotal: Decimal, rate: Decimal) -> (Decimal, Decimal) {
    (subtotal * rate, rate)
}

/// Estimated emissions in kg CO2e, rounded to two places
pub fn carbon_footprint(billable_weight_lbs: f64, distance_miles: f64, multiplier: f64) -> f64 {
    let tonnes = billable_weight_lbs * LB_TO_KG / 1000.0;
    let km = distance_miles * MILES_TO_KM;
    let kg = tonnes * km * EMISSION_FACTOR * multiplier;
    (kg * 100.0).round() / 100.0
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Advance `days` business days from `start`, skipping Saturdays and Sundays.
///
/// The result is always a business day: zero days from a weekend lands on
/// the following Monday.
pub fn add_business_days(start: NaiveDate, days: u32) -> NaiveDate {
    let mut date = start;
    let mut remaining = days;
    while remaining > 0 {
        date += Duration::days(1);
        if !is_weekend(date) {
            remaining -= 1;
        }
    }
    while is_weekend(date) {
        date += Duration::days(1);
    }
    date
}

/// Human-readable delivery estimate, e.g. `"Wed, Oct 21 (1-3 business days)"`
pub fn estimated_delivery(today: NaiveDate, min_days: u32, max_days: u32) -> String {
    let date = add_business_days(today, max_days);
    let window = match (min_days, max_days) {
        (_, 0) => "same day".to_string(),
        (min, max) if min == max && max == 1 => "1 business day".to_string(),
        (min, max) if min == max => format!("{} business days", max),
        (min, max) => format!("{}-{} business days", min, max),
    };
    format!("{} ({})", date.format("%a, %b %-d"), window)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ==================== round_money tests ====================

    #[test]
    fn test_round_money_bankers_rounding_to_even() {
        assert_eq!(round_money(dec!(2.5), 0), dec!(2));
        assert_eq!(round_money(dec!(3.5), 0), dec!(4));
        assert_eq!(round_money(dec!(-2.5), 0), dec!(-2));
    }

    #[test]
    fn test_round_currency() {
        assert_eq!(round_currency(dec!(1.234)), dec!(1.23));
        assert_eq!(round_currency(dec!(1.236)), dec!(1.24));
        assert_eq!(round_currency(dec!(2.345)), dec!(2.34));
        assert_eq!(round_currency(dec!(999999.995)), dec!(1000000.00));
    }

    // ==================== weight tests ====================

    #[test]
    fn test_dimensional_weight() {
        let dim = dimensional_weight(12.0, 12.0, 12.0);
        assert!((dim - 12.431).abs() < 0.001);
    }

    #[test]
    fn test_billable_weight_takes_greater_and_rounds_up() {
        assert_eq!(billable_weight(5.0, 2.0), 5.0);
        assert_eq!(billable_weight(5.0, 12.43), 13.0);
        assert_eq!(billable_weight(0.2, 0.1), 1.0);
        assert_eq!(billable_weight(4.01, 0.0), 5.0);
    }

    // ==================== fee tests ====================

    #[test]
    fn test_base_rate() {
        // (10 + 5 * 0.55 + 100 * 0.012) * 1.15 = 13.95 * 1.15
        let rate = base_rate(dec!(5), dec!(100), dec!(1.15), PackageType::Box);
        assert_eq!(rate, dec!(16.0425));
    }

    #[test]
    fn test_base_rate_increases_with_weight_and_distance() {
        let light = base_rate(dec!(1), dec!(500), dec!(1.3), PackageType::Box);
        let heavy = base_rate(dec!(50), dec!(500), dec!(1.3), PackageType::Box);
        let far = base_rate(dec!(1), dec!(900), dec!(1.3), PackageType::Box);
        assert!(heavy > light);
        assert!(far > light);
    }

    #[test]
    fn test_insurance_tiers() {
        assert_eq!(insurance_fee(dec!(100)), (dec!(0), dec!(0)));
        assert_eq!(insurance_fee(dec!(500)).0, dec!(5.000));
        assert_eq!(insurance_fee(dec!(2000)).0, dec!(30.000));
        assert_eq!(insurance_fee(dec!(10000)).0, dec!(200.000));
        assert_eq!(insurance_rate(dec!(1000.01)), dec!(0.015));
    }

    #[test]
    fn test_special_handling_fees() {
        assert_eq!(special_handling_fees(&[]), dec!(0));
        assert_eq!(
            special_handling_fees(&[SpecialHandling::Fragile, SpecialHandling::Hazmat]),
            dec!(90.00)
        );
    }

    #[test]
    fn test_location_surcharge() {
        assert_eq!(location_surcharge(false, false), dec!(0));
        assert_eq!(location_surcharge(true, false), dec!(4.50));
        assert_eq!(location_surcharge(false, true), dec!(5.25));
        assert_eq!(location_surcharge(true, true), dec!(9.75));
    }

    #[test]
    fn test_delivery_confirmation_fee() {
        assert_eq!(delivery_confirmation_fee(false, false, false), dec!(0));
        assert_eq!(delivery_confirmation_fee(true, false, false), dec!(5.50));
        // Adult signature supersedes plain signature
        assert_eq!(delivery_confirmation_fee(true, true, false), dec!(7.50));
        assert_eq!(delivery_confirmation_fee(false, false, true), dec!(2.50));
        assert_eq!(delivery_confirmation_fee(true, false, true), dec!(8.00));
    }

    #[test]
    fn test_taxes() {
        assert_eq!(taxes(dec!(100), DEFAULT_TAX_RATE), (dec!(8.500), dec!(0.085)));
    }

    #[test]
    fn test_carbon_footprint() {
        // 100 lb over 1000 miles, multiplier 1
        // 0.0453592 t * 1609.344 km * 0.1 = 7.2999...
        assert_eq!(carbon_footprint(100.0, 1000.0, 1.0), 7.3);
        assert_eq!(carbon_footprint(100.0, 0.0, 5.0), 0.0);
    }

    #[test]
    fn test_to_decimal_rejects_non_finite() {
        assert!(to_decimal(f64::NAN).is_none());
        assert!(to_decimal(f64::INFINITY).is_none());
        assert_eq!(to_decimal(2.5), Some(dec!(2.5)));
    }

    // ==================== business day tests ====================

    #[test]
    fn test_add_business_days_skips_weekends() {
        // 2024-01-05 is a Friday
        let friday = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(add_business_days(friday, 0), friday);
        assert_eq!(add_business_days(friday, 1), NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
        assert_eq!(add_business_days(friday, 5), NaiveDate::from_ymd_opt(2024, 1, 12).unwrap());

        // Starting on a Saturday, the next business day is Monday
        let saturday = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
        assert_eq!(add_business_days(saturday, 1), NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
    }

    #[test]
    fn test_same_day_on_weekend_rolls_to_monday() {
        let saturday = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
        let sunday = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        let monday = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
        assert_eq!(add_business_days(saturday, 0), monday);
        assert_eq!(add_business_days(sunday, 0), monday);
        assert_eq!(estimated_delivery(saturday, 0, 0), "Mon, Jan 8 (same day)");
    }

    #[test]
    fn test_estimated_delivery_format() {
        let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(estimated_delivery(monday, 1, 3), "Thu, Jan 4 (1-3 business days)");
        assert_eq!(estimated_delivery(monday, 1, 1), "Tue, Jan 2 (1 business day)");
        assert_eq!(estimated_delivery(monday, 2, 2), "Wed, Jan 3 (2 business days)");
        assert_eq!(estimated_delivery(monday, 0, 0), "Mon, Jan 1 (same day)");
    }

    proptest! {
        #[test]
        fn prop_round_currency_is_idempotent(mantissa in any::<i64>(), scale in 0u32..12) {
            let x = Decimal::new(mantissa, scale);
            let once = round_currency(x);
            prop_assert_eq!(round_currency(once), once);
        }

        #[test]
        fn prop_round_currency_of_floats_is_idempotent(x in -1.0e9f64..1.0e9) {
            let d = to_decimal(x).unwrap_or_default();
            prop_assert_eq!(round_currency(round_currency(d)), round_currency(d));
        }

        #[test]
        fn prop_business_days_never_land_on_weekend(
            offset in 0i64..3650,
            days in 0u32..30,
        ) {
            let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + Duration::days(offset);
            let end = add_business_days(start, days);
            prop_assert!(!is_weekend(end));
            prop_assert!(end >= start);
            if days > 0 {
                prop_assert!(end > start);
            }
        }
    }
}
