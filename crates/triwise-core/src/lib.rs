//! Core contracts and helpers for triwise.
//!
//! This crate defines the factor, allocation and record types shared by the
//! partitioner, the scenario loader, the auditor and the CLI.

pub mod error;
pub mod factor;
pub mod grouping;
pub mod record;
pub mod types;
pub mod validation;

pub use error::{Error, Result};
pub use factor::{Factor, FactorRole, ResolvedFactors, parse_quantity};
pub use grouping::{CategoryGroup, QuantityGroup, group_records};
pub use record::{
    CombinationRecord, FIELD_CATEGORY, FIELD_CATEGORY_TOTAL, FIELD_QUANTITY, FIELD_SUB_CATEGORY,
    FIELD_SUB_CATEGORY_COUNT, RECORD_FIELDS, ResultSet,
};
pub use types::{
    Allocation, Bucket, DEFAULT_SPREAD, MAX_QUANTITY, PartitionLevel, PartitionPolicy,
};
pub use validation::validate_factors;

/// Default parameter set: quantities, cuisines and main ingredients.
pub fn default_factors() -> Vec<Factor> {
    vec![
        Factor::new("Total Vendor", ["50", "80", "120"]),
        Factor::new("Cuisene Type", ["Malay", "Chinese", "Indian"]),
        Factor::new("Main Ingredient", ["Chicken", "Fish", "Vegetable"]),
    ]
}
