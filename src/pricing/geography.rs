//! Geography resolution: postal code distance and shipping zones.
//!
//! Coordinates come from a small fixed table of US postal codes. Anything
//! outside the table falls back to a numeric heuristic, so resolution never
//! fails outright; the caller learns which method produced the distance
//! through [`DistanceMethod`].

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

const EARTH_RADIUS_MILES: f64 = 3958.8;

const HEURISTIC_MIN_MILES: f64 = 50.0;
const HEURISTIC_MAX_MILES: f64 = 3000.0;

/// Distance used when neither lookup nor heuristic can make sense of the codes
pub const FALLBACK_DISTANCE_MILES: f64 = 500.0;

/// Known postal code coordinates (latitude, longitude)
const ZIP_COORDINATES: &[(&str, f64, f64)] = &[
    ("02108", 42.3576, -71.0636),  // Boston, MA
    ("10001", 40.7506, -73.9972),  // New York, NY
    ("19103", 39.9526, -75.1740),  // Philadelphia, PA
    ("20001", 38.9101, -77.0147),  // Washington, DC
    ("30303", 33.7525, -84.3915),  // Atlanta, GA
    ("33101", 25.7791, -80.1978),  // Miami, FL
    ("48226", 42.3314, -83.0479),  // Detroit, MI
    ("60601", 41.8858, -87.6181),  // Chicago, IL
    ("75201", 32.7872, -96.7985),  // Dallas, TX
    ("77002", 29.7564, -95.3627),  // Houston, TX
    ("80202", 39.7527, -104.9992), // Denver, CO
    ("85004", 33.4510, -112.0689), // Phoenix, AZ
    ("90210", 34.0901, -118.4065), // Beverly Hills, CA
    ("94102", 37.7793, -122.4193), // San Francisco, CA
    ("98101", 47.6101, -122.3344), // Seattle, WA
];

/// A priced distance bracket
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingZone {
    pub zone: u8,
    pub min_miles: f64,
    /// Exclusive upper bound; `f64::INFINITY` for the catch-all zone
    #[serde(serialize_with = "serialize_bound")]
    pub max_miles: f64,
    pub multiplier: Decimal,
}

fn serialize_bound<S: serde::Serializer>(value: &f64, s: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        s.serialize_f64(*value)
    } else {
        s.serialize_none()
    }
}

impl ShippingZone {
    /// Whether `miles` falls in `[min_miles, max_miles)`
    pub fn contains(&self, miles: f64) -> bool {
        miles >= self.min_miles && miles < self.max_miles
    }
}

/// The eight zones, contiguous from 0 to infinity
pub const SHIPPING_ZONES: [ShippingZone; 8] = [
    ShippingZone { zone: 1, min_miles: 0.0, max_miles: 150.0, multiplier: dec!(1.00) },
    ShippingZone { zone: 2, min_miles: 150.0, max_miles: 300.0, multiplier: dec!(1.15) },
    ShippingZone { zone: 3, min_miles: 300.0, max_miles: 600.0, multiplier: dec!(1.30) },
    ShippingZone { zone: 4, min_miles: 600.0, max_miles: 1000.0, multiplier: dec!(1.45) },
    ShippingZone { zone: 5, min_miles: 1000.0, max_miles: 1400.0, multiplier: dec!(1.60) },
    ShippingZone { zone: 6, min_miles: 1400.0, max_miles: 1800.0, multiplier: dec!(1.75) },
    ShippingZone { zone: 7, min_miles: 1800.0, max_miles: 2200.0, multiplier: dec!(1.90) },
    ShippingZone { zone: 8, min_miles: 2200.0, max_miles: f64::INFINITY, multiplier: dec!(2.10) },
];

/// Highest zone number; also the default for anything unmatched
pub const MAX_ZONE: u8 = 8;

/// How a distance was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMethod {
    /// Both codes identical after normalisation
    SameLocation,
    /// Great-circle distance between known coordinates
    Haversine,
    /// Numeric difference of the codes, clamped
    Heuristic,
    /// Fixed fallback distance
    Fallback,
}

/// Resolved distance between two postal codes
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceResolution {
    pub miles: f64,
    pub method: DistanceMethod,
}

impl DistanceResolution {
    /// True when the distance is an estimate rather than a coordinate lookup
    pub fn is_estimate(&self) -> bool {
        matches!(self.method, DistanceMethod::Heuristic | DistanceMethod::Fallback)
    }
}

/// Strip ZIP+4 suffixes and whitespace, keeping the 5-digit prefix for US codes
fn normalize_postal_code(code: &str) -> String {
    let trimmed: String = code.chars().filter(|c| !c.is_whitespace()).collect();
    let digits: String = trimmed.chars().filter(|c| *c != '-').collect();
    if digits.len() == 9 && digits.chars().all(|c| c.is_ascii_digit()) {
        return digits[..5].to_string();
    }
    trimmed.to_uppercase()
}

fn lookup_coordinates(code: &str) -> Option<(f64, f64)> {
    ZIP_COORDINATES
        .iter()
        .find(|(zip, _, _)| *zip == code)
        .map(|(_, lat, lon)| (*lat, *lon))
}

fn haversine_miles(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lon1) = (from.0.to_radians(), from.1.to_radians());
    let (lat2, lon2) = (to.0.to_radians(), to.1.to_radians());
    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_MILES * c
}

fn heuristic_miles(a: &str, b: &str) -> Option<f64> {
    let a: u64 = a.parse().ok()?;
    let b: u64 = b.parse().ok()?;
    let diff = a.abs_diff(b) as f64 / 10.0;
    Some(diff.clamp(HEURISTIC_MIN_MILES, HEURISTIC_MAX_MILES))
}

/// Resolve the distance between two postal codes, reporting the method used.
///
/// The pair is ordered before computing so `resolve_distance(a, b)` and
/// `resolve_distance(b, a)` agree exactly.
pub fn resolve_distance(origin_zip: &str, destination_zip: &str) -> DistanceResolution {
    let a = normalize_postal_code(origin_zip);
    let b = normalize_postal_code(destination_zip);
    let (a, b) = if a <= b { (a, b) } else { (b, a) };

    if a == b && !a.is_empty() {
        return DistanceResolution {
            miles: 0.0,
            method: DistanceMethod::SameLocation,
        };
    }

    if let (Some(from), Some(to)) = (lookup_coordinates(&a), lookup_coordinates(&b)) {
        let miles = haversine_miles(from, to);
        if miles.is_finite() {
            return DistanceResolution {
                miles: miles.round(),
                method: DistanceMethod::Haversine,
            };
        }
    }

    match heuristic_miles(&a, &b) {
        Some(miles) => DistanceResolution {
            miles: miles.round(),
            method: DistanceMethod::Heuristic,
        },
        None => DistanceResolution {
            miles: FALLBACK_DISTANCE_MILES,
            method: DistanceMethod::Fallback,
        },
    }
}

/// Distance in miles between two postal codes
pub fn calculate_distance(origin_zip: &str, destination_zip: &str) -> f64 {
    resolve_distance(origin_zip, destination_zip).miles
}

/// Map a distance to its zone; 8 when nothing matches
pub fn get_shipping_zone(distance: f64) -> u8 {
    SHIPPING_ZONES
        .iter()
        .find(|z| z.contains(distance))
        .map(|z| z.zone)
        .unwrap_or(MAX_ZONE)
}

/// Price multiplier for a zone; unknown zones use the zone-8 multiplier
pub fn get_zone_multiplier(zone: u8) -> Decimal {
    SHIPPING_ZONES
        .iter()
        .find(|z| z.zone == zone)
        .unwrap_or(&SHIPPING_ZONES[SHIPPING_ZONES.len() - 1])
        .multiplier
}

static US_ZIP: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{5}(-?\d{4})?$").unwrap());
static CA_POSTAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]\d[A-Za-z] ?\d[A-Za-z]\d$").unwrap());
static MX_POSTAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{5}$").unwrap());

/// Check a postal code's format for the given country
pub fn validate_zip_code(code: &str, country: &str) -> bool {
    let code = code.trim();
    match country.to_uppercase().as_str() {
        "US" => US_ZIP.is_match(code),
        "CA" => CA_POSTAL.is_match(code),
        "MX" => MX_POSTAL.is_match(code),
        _ => (3..=10).contains(&code.chars().count()),
    }
}

/// Business restriction on time-critical services by zone
pub fn is_zone_valid_for_service(zone: u8, service_type: &str) -> bool {
    match service_type {
        "overnight" => zone <= 6,
        "same-day" => zone <= 2,
        _ => true,
    }
}
