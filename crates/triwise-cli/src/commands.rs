use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{info, warn};

use triwise_core::{Factor, PartitionPolicy, group_records};
use triwise_eval::{AuditEngine, AuditOptions};
use triwise_generate::{GenerateOptions, GenerationEngine, GenerationResult};
use triwise_plan::{
    SCENARIO_VERSION, Scenario, ScenarioError, ValidatedScenario, ValidationIssue,
    ValidationReport, scenario_json_schema, validate_scenario, validate_scenario_semantics,
};

use crate::registry::{RunContext, RunOptions, init_file_logging, start_run};
use crate::workspace::{
    ParameterStore, WorkspacePaths, load_or_create_settings, new_artifact_id, save_settings,
    write_bytes_atomic, write_json_atomic,
};
use crate::{
    AuditArgs, CliError, ExportParamsArgs, GenerateArgs, ParamsCommand, SchemaArgs, ValidateArgs,
};

pub(crate) fn run_params(paths: &WorkspacePaths, command: ParamsCommand) -> Result<(), CliError> {
    init_file_logging(&paths.cli_log_path())?;
    let store = ParameterStore::new(paths);

    match command {
        ParamsCommand::List => {
            let factors = store.load()?;
            if factors.is_empty() {
                println!("no parameters stored ({})", store.path().display());
            }
            print_factors(&factors);
        }
        ParamsCommand::Add(args) => {
            let factors = store.add(&args.name, args.values)?;
            info!(event = "parameter_added", name = %args.name, count = factors.len());
            print_factors(&factors);
        }
        ParamsCommand::Update(args) => {
            let factors = store.update(args.index, args.values, args.name.as_deref())?;
            info!(event = "parameter_updated", index = args.index);
            print_factors(&factors);
        }
        ParamsCommand::Remove { index } => {
            let removed = store.remove(index)?;
            info!(event = "parameter_removed", index, name = %removed.name);
            println!("removed {}", removed.name);
        }
        ParamsCommand::Clear => {
            store.clear()?;
            info!(event = "parameters_cleared");
            println!("parameters cleared");
        }
        ParamsCommand::Seed => {
            let factors = store.seed_defaults()?;
            info!(event = "parameters_seeded", count = factors.len());
            print_factors(&factors);
        }
        ParamsCommand::Export(args) => export_params(paths, &store, args)?,
    }

    Ok(())
}

fn export_params(
    paths: &WorkspacePaths,
    store: &ParameterStore,
    args: ExportParamsArgs,
) -> Result<(), CliError> {
    let factors = store.load()?;
    if factors.is_empty() {
        return Err(CliError::InvalidConfig(
            "no parameters stored; add some or run `triwise params seed`".to_string(),
        ));
    }
    let mut scenario = Scenario::new(factors);
    scenario.seed = args.seed;
    scenario.name = args.name;

    let out = match args.out {
        Some(out) => out,
        None => paths
            .scenarios_dir
            .join(format!("{}.scenario.json", new_artifact_id("scenario"))),
    };
    write_json_atomic(&out, &scenario)?;
    info!(event = "scenario_exported", path = %out.display());
    println!("scenario written to {}", out.display());
    Ok(())
}

pub(crate) fn run_generate(paths: &WorkspacePaths, args: GenerateArgs) -> Result<(), CliError> {
    paths.ensure_dirs()?;
    let mut settings = load_or_create_settings(paths)?;

    let (mut scenario, source, issues) = match &args.scenario {
        Some(path) => {
            let validated = load_scenario_reporting(path)?;
            let source = path.display().to_string();
            (validated.scenario, source, validated.warnings)
        }
        None => {
            let store = ParameterStore::new(paths);
            let factors = store.load()?;
            if factors.is_empty() {
                return Err(CliError::InvalidConfig(
                    "no parameters stored; run `triwise params seed` or pass --scenario"
                        .to_string(),
                ));
            }
            let scenario = Scenario::new(factors);
            let report = validate_scenario_semantics(&scenario);
            let issues = report.errors.into_iter().chain(report.warnings).collect();
            (scenario, store.path().display().to_string(), issues)
        }
    };

    if args.strict || args.lenient {
        scenario.options_mut().strict = Some(args.strict);
    }
    if let Some(spread) = args.spread {
        scenario.options_mut().category_policy =
            Some(PartitionPolicy::FairBounded { spread });
    }

    let mut document = settings.document_options();
    if let Some(page_lines) = args.page_lines {
        document.page_lines = page_lines;
    }
    let options = GenerateOptions {
        out_dir: args.out.clone().unwrap_or_else(|| paths.runs_dir.clone()),
        strict: settings.strict,
        seed: args.seed,
        formats: if args.formats.is_empty() {
            settings.formats.clone()
        } else {
            args.formats.clone()
        },
        category_policy: settings.category_policy(),
        sub_category_policy: settings.sub_category_policy(),
        document,
    };

    let engine = GenerationEngine::new(options);
    let handle = engine.start_run()?;
    let run_ctx = RunContext {
        run_id: handle.run_id.clone(),
        started_at: handle.started_at,
        run_dir: handle.run_dir.clone(),
        source: source.clone(),
        scenario_version: scenario.scenario_version.clone(),
        options: run_options(engine.options(), &scenario),
    };
    let run_paths = start_run(&run_ctx)?;
    init_file_logging(&run_paths.logs_path)?;

    info!(event = "run_started", run_id = %handle.run_id, source = %source);
    info!(event = "config_written", path = %run_paths.config_path.display());
    for issue in &issues {
        warn!(
            event = "scenario_issue",
            code = %issue.code,
            path = %issue.path,
            message = %issue.message
        );
        print_issue("warning", issue);
    }

    let timer = Instant::now();
    let result = match engine.run_in(&handle, &scenario) {
        Ok(result) => result,
        Err(err) => {
            warn!(event = "run_finished", status = "failed", error = %err);
            eprintln!(
                "generation failed; see {}",
                handle.run_dir.join("generation_report.json").display()
            );
            return Err(err.into());
        }
    };

    settings.active_run_id = Some(handle.run_id.clone());
    save_settings(paths, &settings)?;

    let duration_ms = timer.elapsed().as_millis();
    info!(event = "run_finished", status = "success", duration_ms = duration_ms);

    print_generation(&result);
    Ok(())
}

fn run_options(options: &GenerateOptions, scenario: &Scenario) -> RunOptions {
    RunOptions {
        strict: scenario.strict().unwrap_or(options.strict),
        seed: scenario.seed.or(options.seed),
        formats: options.formats.clone(),
        category_policy: scenario
            .category_policy()
            .unwrap_or(options.category_policy),
        sub_category_policy: scenario
            .sub_category_policy()
            .unwrap_or(options.sub_category_policy),
        document_title: options.document.title.clone(),
        page_lines: options.document.page_lines,
    }
}

pub(crate) fn run_validate(paths: &WorkspacePaths, args: ValidateArgs) -> Result<(), CliError> {
    init_file_logging(&paths.cli_log_path())?;
    let validated = load_scenario_reporting(&args.scenario)?;
    for issue in &validated.warnings {
        print_issue("warning", issue);
    }
    info!(
        event = "scenario_validated",
        path = %args.scenario.display(),
        warnings = validated.warnings.len()
    );
    println!(
        "{} is valid ({} factor(s), {} warning(s))",
        args.scenario.display(),
        validated.scenario.factors.len(),
        validated.warnings.len()
    );
    Ok(())
}

pub(crate) fn run_audit(paths: &WorkspacePaths, args: AuditArgs) -> Result<(), CliError> {
    init_file_logging(&paths.cli_log_path())?;
    let input = resolve_audit_input(paths, args.input)?;

    let options = AuditOptions {
        strict: !args.lenient,
        max_examples: args.max_examples,
        write_violations: args.write_violations,
        out_dir: args.out,
        shape: None,
    };
    info!(event = "audit_started", input = %input.display(), strict = options.strict);

    let result = AuditEngine::new(options).run(&input);
    match &result {
        Ok(result) => {
            info!(
                event = "audit_finished",
                status = "success",
                violations = result.violations.len()
            );
            println!(
                "audited {} record(s) in {} group(s): {} violation(s), {} warning(s)",
                result.metrics.records,
                result.metrics.quantity_groups,
                result.violations.len(),
                result.metrics.warnings.len()
            );
            println!("report: {}", result.report_path.display());
        }
        Err(err) => {
            warn!(event = "audit_finished", status = "failed", error = %err);
        }
    }
    result.map(|_| ()).map_err(CliError::from)
}

fn resolve_audit_input(paths: &WorkspacePaths, input: Option<PathBuf>) -> Result<PathBuf, CliError> {
    let run_id = match input {
        Some(path) if path.exists() => return Ok(path),
        Some(path) => path.to_string_lossy().into_owned(),
        None => load_or_create_settings(paths)?.active_run_id.ok_or_else(|| {
            CliError::InvalidConfig("no input given and no run recorded yet".to_string())
        })?,
    };
    paths
        .find_run_dir(&run_id)?
        .ok_or_else(|| CliError::InvalidConfig(format!("no run directory or file matches '{run_id}'")))
}

pub(crate) fn run_schema(paths: &WorkspacePaths, args: SchemaArgs) -> Result<(), CliError> {
    let mut encoded = serde_json::to_string_pretty(&scenario_json_schema())?;
    encoded.push('\n');
    match args.out {
        Some(out) => {
            init_file_logging(&paths.cli_log_path())?;
            write_bytes_atomic(&out, encoded.as_bytes())?;
            info!(
                event = "schema_written",
                path = %out.display(),
                scenario_version = SCENARIO_VERSION
            );
            println!("schema written to {}", out.display());
        }
        None => print!("{encoded}"),
    }
    Ok(())
}

/// Load a scenario file, printing every structural or semantic issue when
/// it is rejected.
fn load_scenario_reporting(path: &Path) -> Result<ValidatedScenario, CliError> {
    let contents = std::fs::read_to_string(path)?;
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    validate_scenario(&json).map_err(|report| {
        print_report(&report);
        warn!(
            event = "scenario_rejected",
            path = %path.display(),
            errors = report.errors.len()
        );
        CliError::Scenario(ScenarioError::Invalid(report))
    })
}

fn print_report(report: &ValidationReport) {
    for issue in &report.errors {
        print_issue("error", issue);
    }
    for issue in &report.warnings {
        print_issue("warning", issue);
    }
}

fn print_issue(level: &str, issue: &ValidationIssue) {
    eprintln!("{level}[{}] {}: {}", issue.code, issue.path, issue.message);
    if let Some(hint) = &issue.hint {
        eprintln!("  hint: {hint}");
    }
}

fn print_factors(factors: &[Factor]) {
    for (idx, factor) in factors.iter().enumerate() {
        println!("{idx}: {} = {}", factor.name, factor.values.join(", "));
    }
}

fn print_generation(result: &GenerationResult) {
    let report = &result.report;
    println!("run {} (seed {})", report.run_id, report.seed);
    println!("  dir: {}", result.run_dir.display());

    for group in group_records(&result.records) {
        let categories: Vec<String> = group
            .categories
            .iter()
            .map(|block| format!("{} {}", block.category, block.category_total))
            .collect();
        println!("  Total Vendor = {}: {}", group.quantity, categories.join(", "));
    }

    println!(
        "  {} record(s), {} artifact(s), {} bytes",
        report.records,
        report.artifacts.len(),
        report.bytes_written
    );
    for issue in &report.warnings {
        println!("  warning[{}] {}", issue.code, issue.message);
    }
}

