use serde::{Deserialize, Serialize};

use crate::model::Shape;

/// Metrics contract version for audits.
pub const METRICS_VERSION: &str = "0.1";

/// Machine-readable metrics for an audit, written as `audit_metrics.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditMetrics {
    pub metrics_version: String,
    pub run_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub source: String,
    pub records: u64,
    pub quantity_groups: u64,
    pub category_blocks: u64,
    pub shape: ShapeRef,
    pub checks: CheckSummary,
    pub documented_over_allocations: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<WarningItem>,
    pub performance: PerformanceMetrics,
}

/// Expected shape and where it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeRef {
    pub categories: usize,
    pub sub_categories: usize,
    /// `options`, `scenario` or `inferred`.
    pub origin: String,
}

impl ShapeRef {
    pub fn new(shape: Shape, origin: &str) -> Self {
        Self {
            categories: shape.categories,
            sub_categories: shape.sub_categories,
            origin: origin.to_string(),
        }
    }
}

/// Outcome counters per invariant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckSummary {
    pub category_total_consistency: CheckStats,
    pub category_sums: CheckStats,
    pub sub_category_sums: CheckStats,
    pub minimum_counts: CheckStats,
    pub cardinality: CheckStats,
}

impl CheckSummary {
    pub fn violations(&self) -> u64 {
        self.category_total_consistency.violations
            + self.category_sums.violations
            + self.sub_category_sums.violations
            + self.minimum_counts.violations
            + self.cardinality.violations
    }
}

/// Generic check counter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckStats {
    pub checked: u64,
    pub violations: u64,
}

impl CheckStats {
    pub(crate) fn record(&mut self, ok: bool) {
        self.checked += 1;
        if !ok {
            self.violations += 1;
        }
    }
}

/// Structured warning entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningItem {
    pub code: String,
    pub path: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// Performance timings for the audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub load_ms: u128,
    pub audit_ms: u128,
    pub total_ms: u128,
}
