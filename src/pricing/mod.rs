//! Pricing engine module.
//!
//! Turns a shipment description into priced, carrier-specific delivery
//! options: distance and zone resolution, catalog eligibility and fee
//! composition. The HTTP routes are a thin layer over [`PricingCalculator`].

pub mod calculators;
pub mod catalog;
pub mod fuel;
pub mod geography;
pub mod models;
pub mod responses;
pub mod routes;
pub mod services;
pub mod validation;

// Re-export commonly used items
pub use calculators::{round_currency, round_money};
pub use catalog::{CarrierCatalog, CarrierInfo, CarrierService, StaticCatalog};
pub use fuel::{DailyFuelSurcharge, FixedFuelSurcharge, FuelSurchargeSource, RandomFuelSurcharge};
pub use models::{ServiceCategory, ShipmentDetails};
pub use responses::{PricingBreakdown, PricingOption, QuoteResult};
pub use routes::router;
pub use services::{PricingCalculator, QuoteContext, QuoteError, ServiceQuoteError};
pub use validation::ValidationError;
