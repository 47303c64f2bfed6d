use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const FIELD_QUANTITY: &str = "Total Vendor";
pub const FIELD_CATEGORY_TOTAL: &str = "Number of vendor";
pub const FIELD_CATEGORY: &str = "Cuisene Type";
pub const FIELD_SUB_CATEGORY: &str = "Main Ingredient";
pub const FIELD_SUB_CATEGORY_COUNT: &str = "No. of vendor per ingredient";

/// Serialized field names in record order. Renderers and exporters key on
/// these, so they must not change.
pub const RECORD_FIELDS: [&str; 5] = [
    FIELD_QUANTITY,
    FIELD_CATEGORY_TOTAL,
    FIELD_CATEGORY,
    FIELD_SUB_CATEGORY,
    FIELD_SUB_CATEGORY_COUNT,
];

/// One flattened leaf of the quantity x category x sub-category product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CombinationRecord {
    #[serde(rename = "Total Vendor")]
    pub quantity: u64,
    #[serde(rename = "Number of vendor")]
    pub category_total: u64,
    #[serde(rename = "Cuisene Type")]
    pub category: String,
    #[serde(rename = "Main Ingredient")]
    pub sub_category: String,
    #[serde(rename = "No. of vendor per ingredient")]
    pub sub_category_count: u64,
}

impl CombinationRecord {
    /// Field values rendered as text, in `RECORD_FIELDS` order.
    pub fn to_fields(&self) -> [String; 5] {
        [
            self.quantity.to_string(),
            self.category_total.to_string(),
            self.category.clone(),
            self.sub_category.clone(),
            self.sub_category_count.to_string(),
        ]
    }
}

/// Ordered output of one enumeration.
pub type ResultSet = Vec<CombinationRecord>;
