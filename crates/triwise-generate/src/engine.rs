use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use triwise_core::{FactorRole, MAX_QUANTITY, ResultSet, parse_quantity};
use triwise_plan::{SCENARIO_VERSION, Scenario};

use crate::enumerate::{EnumerateMode, Enumeration, Enumerator};
use crate::errors::GenerationError;
use crate::model::{ArtifactReport, GenerateOptions, GenerationIssue, GenerationReport};
use crate::output::{ExportError, csv::write_csv, export_to_path};

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub run_dir: PathBuf,
    pub report: GenerationReport,
    pub records: ResultSet,
}

/// Identity and location of one run.
#[derive(Debug, Clone)]
pub struct RunHandle {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub run_dir: PathBuf,
}

/// Entry point for turning a scenario into a run directory of artifacts.
#[derive(Debug, Clone)]
pub struct GenerationEngine {
    options: GenerateOptions,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Create a fresh `{timestamp}__run_{id}` directory under `out_dir`.
    pub fn start_run(&self) -> Result<RunHandle, GenerationError> {
        let run_id = uuid::Uuid::new_v4().to_string();
        let started_at = Utc::now();
        let timestamp = started_at.format("%Y-%m-%dT%H-%M-%SZ").to_string();
        let run_dir = self
            .options
            .out_dir
            .join(format!("{timestamp}__run_{run_id}"));
        std::fs::create_dir_all(&run_dir)?;
        Ok(RunHandle {
            run_id,
            started_at,
            run_dir,
        })
    }

    pub fn run(&self, scenario: &Scenario) -> Result<GenerationResult, GenerationError> {
        let handle = self.start_run()?;
        self.run_in(&handle, scenario)
    }

    /// Generate into a run directory created by [`GenerationEngine::start_run`].
    pub fn run_in(
        &self,
        handle: &RunHandle,
        scenario: &Scenario,
    ) -> Result<GenerationResult, GenerationError> {
        if scenario.scenario_version != SCENARIO_VERSION {
            return Err(GenerationError::InvalidScenario(format!(
                "scenario_version '{}' is not supported (expected '{}')",
                scenario.scenario_version, SCENARIO_VERSION
            )));
        }
        if let Some(quantity) = oversized_quantity(scenario) {
            return Err(GenerationError::InvalidScenario(format!(
                "quantity {quantity} exceeds the limit of {MAX_QUANTITY}"
            )));
        }

        let start = Instant::now();
        let run_id = handle.run_id.clone();
        let run_dir = handle.run_dir.clone();

        let resolved = self.resolve_scenario(scenario);
        let seed = resolved.seed.unwrap_or_default();
        let strict = resolved.strict().unwrap_or(self.options.strict);
        let category_policy = resolved
            .category_policy()
            .unwrap_or(self.options.category_policy);
        let sub_category_policy = resolved
            .sub_category_policy()
            .unwrap_or(self.options.sub_category_policy);

        let scenario_path = run_dir.join("resolved_scenario.json");
        std::fs::write(&scenario_path, serde_json::to_vec_pretty(&resolved)?)?;

        let mut report = GenerationReport::new(
            run_id.clone(),
            seed,
            strict,
            category_policy,
            sub_category_policy,
        );
        report.scenario_name = resolved.name.clone();

        info!(
            run_id = %run_id,
            seed,
            strict,
            factors = resolved.factors.len(),
            category_policy = category_policy.name(),
            sub_category_policy = sub_category_policy.name(),
            "generation started"
        );

        let enumerator = Enumerator::new()
            .with_category_policy(category_policy)
            .with_sub_category_policy(sub_category_policy)
            .with_mode(if strict {
                EnumerateMode::Strict
            } else {
                EnumerateMode::Compatible
            });

        let outcome = self.generate(&resolved, &enumerator, seed, &run_dir, &mut report);

        report.duration_ms = start.elapsed().as_millis() as u64;
        let report_path = run_dir.join("generation_report.json");
        let write_report = |report: &GenerationReport| -> Result<(), GenerationError> {
            std::fs::write(&report_path, serde_json::to_vec_pretty(report)?)?;
            Ok(())
        };

        match outcome {
            Ok(records) => {
                write_report(&report)?;
                info!(
                    run_id = %run_id,
                    records = report.records,
                    artifacts = report.artifacts.len(),
                    warnings = report.warnings.len(),
                    duration_ms = report.duration_ms,
                    bytes_written = report.bytes_written,
                    "generation completed"
                );
                Ok(GenerationResult {
                    run_dir,
                    report,
                    records,
                })
            }
            Err(err) => {
                report.record_failure(err.to_string());
                write_report(&report)?;
                warn!(run_id = %run_id, error = %err, "generation failed");
                Err(err)
            }
        }
    }

    /// Fill in the seed, strictness and policies the run will actually use.
    fn resolve_scenario(&self, scenario: &Scenario) -> Scenario {
        let mut resolved = scenario.clone();
        if resolved.seed.is_none() {
            resolved.seed = Some(self.options.seed.unwrap_or_else(|| rand::rng().random()));
        }
        let strict = self.options.strict;
        let category_policy = self.options.category_policy;
        let sub_category_policy = self.options.sub_category_policy;
        let options = resolved.options_mut();
        options.strict.get_or_insert(strict);
        options.category_policy.get_or_insert(category_policy);
        options.sub_category_policy.get_or_insert(sub_category_policy);
        resolved
    }

    fn generate(
        &self,
        scenario: &Scenario,
        enumerator: &Enumerator,
        seed: u64,
        run_dir: &Path,
        report: &mut GenerationReport,
    ) -> Result<ResultSet, GenerationError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let enumeration = enumerator.enumerate(&scenario.factors, &mut rng)?;
        record_enumeration(scenario, &enumeration, report);
        let records = enumeration.into_records();

        if records.is_empty() {
            if enumerator.mode() == EnumerateMode::Strict {
                return Err(ExportError::EmptyResultSet.into());
            }
            let issue = GenerationIssue::warning(
                "empty_result_set",
                "no combinations were produced; export skipped",
                None,
            );
            log_issue(&issue);
            report.record_warning(issue);
            return Ok(records);
        }

        let mut csv_bytes = Vec::new();
        write_csv(&mut csv_bytes, &records)?;
        report.records_fingerprint = Some(hex::encode(Sha256::digest(&csv_bytes)));

        for format in &self.options.formats {
            let path = run_dir.join(format.file_name());
            let bytes = export_to_path(*format, &records, &self.options.document, &path)?;
            report.bytes_written += bytes;
            report.artifacts.push(ArtifactReport {
                format: *format,
                file: format.file_name().to_string(),
                bytes,
            });
            info!(format = %format, bytes, "artifact written");
        }

        Ok(records)
    }
}

fn oversized_quantity(scenario: &Scenario) -> Option<u64> {
    FactorRole::Quantity
        .resolve(&scenario.factors)?
        .values
        .iter()
        .filter_map(|token| parse_quantity(token))
        .find(|quantity| *quantity > MAX_QUANTITY)
}

fn record_enumeration(scenario: &Scenario, enumeration: &Enumeration, report: &mut GenerationReport) {
    report.records = enumeration.records.len() as u64;
    report.quantities_used = enumeration.quantities_used;
    report.quantities_skipped = enumeration.skipped_quantities.clone();
    report.over_allocations = enumeration.over_allocations.clone();
    report.categories = FactorRole::Category
        .resolve(&scenario.factors)
        .map(|factor| factor.values.len())
        .unwrap_or(0);
    report.sub_categories = FactorRole::SubCategory
        .resolve(&scenario.factors)
        .map(|factor| factor.values.len())
        .unwrap_or(0);

    if let Some(role) = enumeration.unresolved_role {
        push_warning(
            report,
            GenerationIssue::warning(
                "role_unresolved",
                format!(
                    "no factor matches the {role} role (accepted: {})",
                    role.aliases().join(", ")
                ),
                Some("/factors".to_string()),
            ),
        );
    }
    for token in &enumeration.skipped_quantities {
        push_warning(
            report,
            GenerationIssue::warning(
                "quantity_skipped",
                format!("'{token}' is not a positive integer and yields no records"),
                None,
            ),
        );
    }
    for over in &enumeration.over_allocations {
        let scope = match &over.category {
            Some(category) => format!("category '{category}' of quantity {}", over.quantity),
            None => format!("quantity {}", over.quantity),
        };
        push_warning(
            report,
            GenerationIssue::warning(
                "partition_over_allocated",
                format!(
                    "{} split of {scope} allocated {} for a total of {} across {} buckets",
                    over.level, over.allocated, over.total, over.buckets
                ),
                None,
            ),
        );
    }
}

fn push_warning(report: &mut GenerationReport, issue: GenerationIssue) {
    log_issue(&issue);
    report.record_warning(issue);
}

fn log_issue(issue: &GenerationIssue) {
    warn!(
        code = %issue.code,
        path = issue.path.as_deref().unwrap_or(""),
        message = %issue.message
    );
}
