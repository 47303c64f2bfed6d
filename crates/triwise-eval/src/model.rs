use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::metrics::AuditMetrics;

/// Options for auditing a result set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditOptions {
    /// Fail when any violation is found.
    pub strict: bool,
    /// Limit the number of examples emitted in the report.
    pub max_examples: usize,
    /// Emit violations.json with the full list of violations.
    pub write_violations: bool,
    /// Optional output directory override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<PathBuf>,
    /// Expected categories x sub-categories per quantity group. When unset
    /// the shape is read from `resolved_scenario.json` or inferred.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<Shape>,
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self {
            strict: true,
            max_examples: 20,
            write_violations: false,
            out_dir: None,
            shape: None,
        }
    }
}

/// Number of category and sub-category labels behind a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    pub categories: usize,
    pub sub_categories: usize,
}

impl Shape {
    pub fn records_per_group(&self) -> usize {
        self.categories * self.sub_categories
    }
}

/// Structured violation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub code: String,
    pub path: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_index: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

/// Result of an audit run.
#[derive(Debug, Clone)]
pub struct AuditResult {
    pub out_dir: PathBuf,
    pub metrics_path: PathBuf,
    pub report_path: PathBuf,
    pub violations_path: Option<PathBuf>,
    pub metrics: AuditMetrics,
    pub report: String,
    pub violations: Vec<Violation>,
}
