use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default spread threshold for fair-bounded partitions.
pub const DEFAULT_SPREAD: u64 = 10;

/// Largest quantity a scenario may carry. Fair-bounded hands out one unit
/// per step, so run time is linear in the quantity.
pub const MAX_QUANTITY: u64 = 10_000_000;

/// How a total is split across buckets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PartitionPolicy {
    /// Every bucket starts at one; single units go to buckets within
    /// `spread` of the current maximum.
    FairBounded {
        #[serde(default = "default_spread")]
        spread: u64,
    },
    /// Draw a share of the full total in `[min, min(max, remaining / total)]`.
    ProportionalOfTotal { min: f64, max: f64 },
    /// Draw a count in `[min, max]` percent of what is still unallocated.
    ProportionalOfRemaining { min: f64, max: f64 },
}

fn default_spread() -> u64 {
    DEFAULT_SPREAD
}

impl PartitionPolicy {
    /// Policy applied when splitting a quantity across categories.
    pub const fn category_default() -> Self {
        PartitionPolicy::FairBounded {
            spread: DEFAULT_SPREAD,
        }
    }

    /// Policy applied when splitting a category across sub-categories.
    pub const fn sub_category_default() -> Self {
        PartitionPolicy::ProportionalOfRemaining { min: 0.1, max: 0.7 }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PartitionPolicy::FairBounded { .. } => "fair_bounded",
            PartitionPolicy::ProportionalOfTotal { .. } => "proportional_of_total",
            PartitionPolicy::ProportionalOfRemaining { .. } => "proportional_of_remaining",
        }
    }

    /// Reject proportion bounds outside `[0, 1]` or with `min > max`.
    pub fn validate(&self) -> Result<()> {
        match *self {
            PartitionPolicy::FairBounded { .. } => Ok(()),
            PartitionPolicy::ProportionalOfTotal { min, max }
            | PartitionPolicy::ProportionalOfRemaining { min, max } => {
                if !(0.0..=1.0).contains(&min) || !(0.0..=1.0).contains(&max) {
                    return Err(Error::InvalidPolicy(format!(
                        "{}: min and max must be within [0, 1]",
                        self.name()
                    )));
                }
                if min > max {
                    return Err(Error::InvalidPolicy(format!(
                        "{}: min must be <= max",
                        self.name()
                    )));
                }
                Ok(())
            }
        }
    }
}

/// Nesting level a partition runs at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PartitionLevel {
    Category,
    SubCategory,
}

impl fmt::Display for PartitionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartitionLevel::Category => f.write_str("category"),
            PartitionLevel::SubCategory => f.write_str("sub_category"),
        }
    }
}

/// One labelled slot of an allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Bucket {
    pub label: String,
    pub count: u64,
}

/// Label to count mapping, kept in label declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Allocation {
    /// Total that was requested from the partitioner.
    pub total: u64,
    pub buckets: Vec<Bucket>,
}

impl Allocation {
    pub fn new(total: u64, buckets: Vec<Bucket>) -> Self {
        Self { total, buckets }
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn get(&self, label: &str) -> Option<u64> {
        self.buckets
            .iter()
            .find(|bucket| bucket.label == label)
            .map(|bucket| bucket.count)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bucket> {
        self.buckets.iter()
    }

    pub fn sum(&self) -> u64 {
        self.buckets.iter().map(|bucket| bucket.count).sum()
    }

    /// True when minimum-one clamping pushed the sum past the total.
    pub fn is_over_allocated(&self) -> bool {
        !self.buckets.is_empty() && self.sum() > self.total
    }

    pub fn max_count(&self) -> Option<u64> {
        self.buckets.iter().map(|bucket| bucket.count).max()
    }
}
