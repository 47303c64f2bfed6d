use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use triwise_core::PartitionPolicy;

use crate::enumerate::OverAllocation;
use crate::output::{DocumentOptions, ExportFormat};

/// Options for the generation engine. Scenario options override the policy
/// and strictness fields; a scenario seed overrides `seed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Directory where run directories are created.
    pub out_dir: PathBuf,
    /// Fail on unresolved roles, invalid labels and infeasible partitions.
    pub strict: bool,
    /// Seed used when the scenario does not carry one.
    pub seed: Option<u64>,
    /// Artifacts written into the run directory.
    pub formats: Vec<ExportFormat>,
    pub category_policy: PartitionPolicy,
    pub sub_category_policy: PartitionPolicy,
    pub document: DocumentOptions,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("runs"),
            strict: false,
            seed: None,
            formats: ExportFormat::ALL.to_vec(),
            category_policy: PartitionPolicy::category_default(),
            sub_category_policy: PartitionPolicy::sub_category_default(),
            document: DocumentOptions::default(),
        }
    }
}

/// One export written during a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactReport {
    pub format: ExportFormat,
    pub file: String,
    pub bytes: u64,
}

/// Structured generation issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationIssue {
    pub level: String,
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl GenerationIssue {
    pub fn warning(code: &str, message: impl Into<String>, path: Option<String>) -> Self {
        Self {
            level: "warning".to_string(),
            code: code.to_string(),
            message: message.into(),
            path,
        }
    }

    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Self {
            level: "error".to_string(),
            code: code.to_string(),
            message: message.into(),
            path: None,
        }
    }
}

/// Report for a generation run, written as `generation_report.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario_name: Option<String>,
    pub seed: u64,
    pub strict: bool,
    pub category_policy: PartitionPolicy,
    pub sub_category_policy: PartitionPolicy,
    pub quantities_used: usize,
    pub quantities_skipped: Vec<String>,
    pub categories: usize,
    pub sub_categories: usize,
    pub records: u64,
    /// sha256 of the CSV rendering of the result set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub records_fingerprint: Option<String>,
    pub over_allocations: Vec<OverAllocation>,
    pub artifacts: Vec<ArtifactReport>,
    pub bytes_written: u64,
    pub duration_ms: u64,
    pub warnings_by_code: BTreeMap<String, u64>,
    pub warnings: Vec<GenerationIssue>,
    pub errors: Vec<GenerationIssue>,
}

impl GenerationReport {
    pub fn new(
        run_id: String,
        seed: u64,
        strict: bool,
        category_policy: PartitionPolicy,
        sub_category_policy: PartitionPolicy,
    ) -> Self {
        Self {
            run_id,
            scenario_name: None,
            seed,
            strict,
            category_policy,
            sub_category_policy,
            quantities_used: 0,
            quantities_skipped: Vec::new(),
            categories: 0,
            sub_categories: 0,
            records: 0,
            records_fingerprint: None,
            over_allocations: Vec::new(),
            artifacts: Vec::new(),
            bytes_written: 0,
            duration_ms: 0,
            warnings_by_code: BTreeMap::new(),
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn record_warning(&mut self, issue: GenerationIssue) {
        *self.warnings_by_code.entry(issue.code.clone()).or_insert(0) += 1;
        self.warnings.push(issue);
    }

    pub fn record_failure(&mut self, message: String) {
        self.errors
            .push(GenerationIssue::error("generation_failed", message));
    }
}
