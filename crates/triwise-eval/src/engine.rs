use std::path::{Path, PathBuf};
use std::time::Instant;

use triwise_core::{CombinationRecord, FactorRole, ResultSet};
use triwise_generate::{ExportFormat, GenerationReport};
use triwise_plan::Scenario;

use crate::audit::{audit_records, infer_shape};
use crate::errors::AuditError;
use crate::metrics::{AuditMetrics, METRICS_VERSION, PerformanceMetrics, ShapeRef};
use crate::model::{AuditOptions, AuditResult, Shape, Violation};
use crate::report::render_report;

/// Audit exported result sets against the allocation invariants.
#[derive(Debug, Clone)]
pub struct AuditEngine {
    options: AuditOptions,
}

impl AuditEngine {
    pub fn new(options: AuditOptions) -> Self {
        Self { options }
    }

    /// Audit a run directory (its `combinations.csv` or `combinations.json`)
    /// or a single CSV/JSON export.
    pub fn run(&self, input: &Path) -> Result<AuditResult, AuditError> {
        let total_start = Instant::now();
        let load_start = Instant::now();

        let (run_dir, source) = resolve_source(input)?;
        let records = load_records(&source)?;
        if records.is_empty() {
            return Err(AuditError::InvalidDataset(format!(
                "'{}' holds no records",
                source.display()
            )));
        }
        let generation = run_dir.as_deref().and_then(read_generation_report);
        let (shape, origin) = match self.options.shape {
            Some(shape) => (shape, "options"),
            None => match run_dir.as_deref().and_then(read_scenario_shape) {
                Some(shape) => (shape, "scenario"),
                None => (infer_shape(&records), "inferred"),
            },
        };

        let load_ms = load_start.elapsed().as_millis();
        let audit_start = Instant::now();

        let mut outcome = audit_records(&records, shape);
        sort_violations(&mut outcome.violations);

        let audit_ms = audit_start.elapsed().as_millis();
        let total_ms = total_start.elapsed().as_millis();

        let run_id = generation
            .as_ref()
            .map(|report| report.run_id.clone())
            .or_else(|| run_dir.as_deref().and_then(run_id_from_dir_name))
            .unwrap_or_else(|| "unknown".to_string());

        let metrics = AuditMetrics {
            metrics_version: METRICS_VERSION.to_string(),
            run_id,
            seed: generation.as_ref().map(|report| report.seed),
            source: source.display().to_string(),
            records: records.len() as u64,
            quantity_groups: outcome.quantity_groups,
            category_blocks: outcome.category_blocks,
            shape: ShapeRef::new(shape, origin),
            checks: outcome.checks,
            documented_over_allocations: outcome.documented_over_allocations,
            warnings: outcome.warnings,
            performance: PerformanceMetrics {
                load_ms,
                audit_ms,
                total_ms,
            },
        };
        let violations = outcome.violations;

        let report = render_report(&metrics, &violations, self.options.max_examples);
        let out_dir = match (&self.options.out_dir, &run_dir) {
            (Some(dir), _) => dir.clone(),
            (None, Some(dir)) => dir.clone(),
            (None, None) => source
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        };
        std::fs::create_dir_all(&out_dir)?;

        let metrics_path = out_dir.join("audit_metrics.json");
        std::fs::write(&metrics_path, serde_json::to_vec_pretty(&metrics)?)?;

        let report_path = out_dir.join("audit_report.md");
        std::fs::write(&report_path, report.as_bytes())?;

        let violations_path = if self.options.write_violations {
            let path = out_dir.join("violations.json");
            std::fs::write(&path, serde_json::to_vec_pretty(&violations)?)?;
            Some(path)
        } else {
            None
        };

        if self.options.strict && !violations.is_empty() {
            return Err(AuditError::Violations(violations.len() as u64));
        }

        Ok(AuditResult {
            out_dir,
            metrics_path,
            report_path,
            violations_path,
            metrics,
            report,
            violations,
        })
    }
}

/// Load records from a CSV or JSON export, keyed by the record field names.
pub fn load_records(path: &Path) -> Result<ResultSet, AuditError> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        let contents = std::fs::read_to_string(path)?;
        return Ok(serde_json::from_str(&contents)?);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize::<CombinationRecord>() {
        records.push(row?);
    }
    Ok(records)
}

fn resolve_source(input: &Path) -> Result<(Option<PathBuf>, PathBuf), AuditError> {
    if !input.is_dir() {
        if !input.is_file() {
            return Err(AuditError::InvalidDataset(format!(
                "'{}' does not exist",
                input.display()
            )));
        }
        return Ok((None, input.to_path_buf()));
    }

    for format in [ExportFormat::Csv, ExportFormat::Json] {
        let candidate = input.join(format.file_name());
        if candidate.is_file() {
            return Ok((Some(input.to_path_buf()), candidate));
        }
    }
    Err(AuditError::InvalidDataset(format!(
        "'{}' has no {} or {}",
        input.display(),
        ExportFormat::Csv.file_name(),
        ExportFormat::Json.file_name()
    )))
}

fn read_generation_report(run_dir: &Path) -> Option<GenerationReport> {
    let contents = std::fs::read_to_string(run_dir.join("generation_report.json")).ok()?;
    serde_json::from_str(&contents).ok()
}

fn read_scenario_shape(run_dir: &Path) -> Option<Shape> {
    let contents = std::fs::read_to_string(run_dir.join("resolved_scenario.json")).ok()?;
    let scenario: Scenario = serde_json::from_str(&contents).ok()?;
    let categories = FactorRole::Category.resolve(&scenario.factors)?;
    let sub_categories = FactorRole::SubCategory.resolve(&scenario.factors)?;
    Some(Shape {
        categories: categories.values.len(),
        sub_categories: sub_categories.values.len(),
    })
}

fn run_id_from_dir_name(run_dir: &Path) -> Option<String> {
    let name = run_dir.file_name()?.to_string_lossy();
    name.split_once("__run_")
        .map(|(_, run_part)| run_part.to_string())
}

fn sort_violations(violations: &mut [Violation]) {
    violations.sort_by(|a, b| {
        (a.row_index.unwrap_or_default(), a.code.as_str(), a.path.as_str()).cmp(&(
            b.row_index.unwrap_or_default(),
            b.code.as_str(),
            b.path.as_str(),
        ))
    });
}
