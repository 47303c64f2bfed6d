use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use triwise_core::{Factor, PartitionPolicy};

/// Current contract version for `scenario.json` documents.
pub const SCENARIO_VERSION: &str = "0.1";

/// Optional scenario-level options. Unset fields fall back to engine options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScenarioOptions {
    /// Turn unresolved roles and infeasible partitions into errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
    /// Policy used to split each quantity across categories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_policy: Option<PartitionPolicy>,
    /// Policy used to split each category across sub-categories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_category_policy: Option<PartitionPolicy>,
}

/// Canonical scenario definition for generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Scenario {
    /// Contract version for the scenario format.
    pub scenario_version: String,
    /// Human-readable label used in reports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Seed for reproducibility. Runs without a seed draw one and record it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Quantity, category and sub-category factors, resolved by name.
    pub factors: Vec<Factor>,
    /// Optional scenario-level options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<ScenarioOptions>,
}

impl Scenario {
    pub fn new(factors: Vec<Factor>) -> Self {
        Self {
            scenario_version: SCENARIO_VERSION.to_string(),
            name: None,
            seed: None,
            factors,
            options: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn strict(&self) -> Option<bool> {
        self.options.as_ref().and_then(|opts| opts.strict)
    }

    pub fn category_policy(&self) -> Option<PartitionPolicy> {
        self.options.as_ref().and_then(|opts| opts.category_policy)
    }

    pub fn sub_category_policy(&self) -> Option<PartitionPolicy> {
        self.options.as_ref().and_then(|opts| opts.sub_category_policy)
    }

    pub fn options_mut(&mut self) -> &mut ScenarioOptions {
        self.options.get_or_insert_with(ScenarioOptions::default)
    }
}
