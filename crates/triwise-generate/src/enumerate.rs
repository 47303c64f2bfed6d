use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use triwise_core::{
    CombinationRecord, Error, Factor, FactorRole, PartitionLevel, PartitionPolicy,
    ResolvedFactors, ResultSet, parse_quantity, validate_factors,
};

use crate::partition::partition;

/// How the enumerator reacts to unresolved roles and infeasible partitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumerateMode {
    /// Unresolved roles yield no records; over-allocations are only recorded.
    #[default]
    Compatible,
    /// Unresolved roles, invalid labels and over-allocations are errors.
    Strict,
}

/// A partition whose minimum-one clamping pushed the sum past its total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverAllocation {
    pub level: PartitionLevel,
    pub quantity: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub total: u64,
    pub allocated: u64,
    pub buckets: usize,
}

impl OverAllocation {
    fn into_error(self) -> Error {
        Error::InfeasiblePartition {
            level: self.level,
            total: self.total,
            buckets: self.buckets,
            allocated: self.allocated,
        }
    }
}

/// Records plus the diagnostics gathered while producing them.
#[derive(Debug, Clone, Default)]
pub struct Enumeration {
    pub records: ResultSet,
    /// Quantity tokens that were not positive integers.
    pub skipped_quantities: Vec<String>,
    pub over_allocations: Vec<OverAllocation>,
    /// Set when compatible mode gave up on an unresolved role.
    pub unresolved_role: Option<FactorRole>,
    /// Number of quantity values that produced records.
    pub quantities_used: usize,
}

impl Enumeration {
    pub fn into_records(self) -> ResultSet {
        self.records
    }
}

/// Drives the partitioner over quantity, category and sub-category factors.
#[derive(Debug, Clone)]
pub struct Enumerator {
    category_policy: PartitionPolicy,
    sub_category_policy: PartitionPolicy,
    mode: EnumerateMode,
}

impl Default for Enumerator {
    fn default() -> Self {
        Self {
            category_policy: PartitionPolicy::category_default(),
            sub_category_policy: PartitionPolicy::sub_category_default(),
            mode: EnumerateMode::Compatible,
        }
    }
}

impl Enumerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category_policy(mut self, policy: PartitionPolicy) -> Self {
        self.category_policy = policy;
        self
    }

    pub fn with_sub_category_policy(mut self, policy: PartitionPolicy) -> Self {
        self.sub_category_policy = policy;
        self
    }

    pub fn with_mode(mut self, mode: EnumerateMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> EnumerateMode {
        self.mode
    }

    /// Resolve roles from `factors` and enumerate every leaf.
    ///
    /// In compatible mode an unresolved role returns an empty enumeration
    /// with `unresolved_role` set instead of an error.
    pub fn enumerate(&self, factors: &[Factor], rng: &mut impl Rng) -> Result<Enumeration, Error> {
        let resolved = match ResolvedFactors::resolve(factors) {
            Ok(resolved) => resolved,
            Err(Error::UnresolvedRole(role)) if self.mode == EnumerateMode::Compatible => {
                debug!(role = %role, "role unresolved, no records emitted");
                return Ok(Enumeration {
                    unresolved_role: Some(role),
                    ..Enumeration::default()
                });
            }
            Err(err) => return Err(err),
        };
        self.enumerate_resolved(&resolved, rng)
    }

    /// Enumerate quantities (outer), categories (middle) and sub-categories
    /// (inner) of already bound factors.
    pub fn enumerate_resolved(
        &self,
        factors: &ResolvedFactors<'_>,
        rng: &mut impl Rng,
    ) -> Result<Enumeration, Error> {
        self.category_policy.validate()?;
        self.sub_category_policy.validate()?;
        if self.mode == EnumerateMode::Strict {
            validate_factors(factors)?;
        }

        let categories = &factors.category.values;
        let sub_categories = &factors.sub_category.values;
        let mut enumeration = Enumeration::default();

        for token in &factors.quantity.values {
            let Some(quantity) = parse_quantity(token) else {
                debug!(token = %token, "quantity skipped");
                enumeration.skipped_quantities.push(token.clone());
                continue;
            };
            enumeration.quantities_used += 1;

            let by_category = partition(quantity, categories, &self.category_policy, rng);
            if by_category.is_over_allocated() {
                self.record_over_allocation(
                    &mut enumeration,
                    OverAllocation {
                        level: PartitionLevel::Category,
                        quantity,
                        category: None,
                        total: quantity,
                        allocated: by_category.sum(),
                        buckets: by_category.len(),
                    },
                )?;
            }

            for category in by_category.iter() {
                let by_sub_category =
                    partition(category.count, sub_categories, &self.sub_category_policy, rng);
                if by_sub_category.is_over_allocated() {
                    self.record_over_allocation(
                        &mut enumeration,
                        OverAllocation {
                            level: PartitionLevel::SubCategory,
                            quantity,
                            category: Some(category.label.clone()),
                            total: category.count,
                            allocated: by_sub_category.sum(),
                            buckets: by_sub_category.len(),
                        },
                    )?;
                }

                enumeration
                    .records
                    .extend(by_sub_category.iter().map(|sub| CombinationRecord {
                        quantity,
                        category_total: category.count,
                        category: category.label.clone(),
                        sub_category: sub.label.clone(),
                        sub_category_count: sub.count,
                    }));
            }
        }

        Ok(enumeration)
    }

    fn record_over_allocation(
        &self,
        enumeration: &mut Enumeration,
        over: OverAllocation,
    ) -> Result<(), Error> {
        if self.mode == EnumerateMode::Strict {
            return Err(over.into_error());
        }
        debug!(
            level = %over.level,
            quantity = over.quantity,
            total = over.total,
            allocated = over.allocated,
            "partition over-allocated"
        );
        enumeration.over_allocations.push(over);
        Ok(())
    }
}

/// Enumerate with default policies in compatible mode and keep only the
/// records.
pub fn enumerate_records(factors: &[Factor], rng: &mut impl Rng) -> ResultSet {
    Enumerator::default()
        .enumerate(factors, rng)
        .map(Enumeration::into_records)
        .unwrap_or_default()
}
