use std::fs;
use std::path::PathBuf;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use triwise_core::default_factors;
use triwise_eval::{AuditEngine, AuditError, AuditOptions, load_records};
use triwise_generate::{
    DocumentOptions, ExportFormat, GenerateOptions, GenerationEngine, enumerate_records,
    export_to_path,
};
use triwise_plan::Scenario;

fn generate_run(label: &str) -> PathBuf {
    let options = GenerateOptions {
        out_dir: temp_dir(label),
        formats: vec![ExportFormat::Csv],
        ..GenerateOptions::default()
    };
    let scenario = Scenario::new(default_factors()).with_seed(77);
    GenerationEngine::new(options)
        .run(&scenario)
        .expect("generate run")
        .run_dir
}

#[test]
fn generated_run_passes_audit() {
    let run_dir = generate_run("clean");
    let result = AuditEngine::new(AuditOptions::default())
        .run(&run_dir)
        .expect("audit run");

    assert!(result.violations.is_empty(), "{:?}", result.violations);
    assert_eq!(result.metrics.records, 27);
    assert_eq!(result.metrics.quantity_groups, 3);
    assert_eq!(result.metrics.seed, Some(77));
    assert_eq!(result.metrics.shape.origin, "scenario");
    assert!(run_dir.to_string_lossy().ends_with(&result.metrics.run_id));
    assert!(result.metrics_path.is_file());
    assert!(result.report.contains("- no violations detected."));
}

#[test]
fn tampered_csv_is_flagged() {
    let run_dir = generate_run("tampered");
    let csv_path = run_dir.join("combinations.csv");
    let contents = fs::read_to_string(&csv_path).expect("read csv");
    let mut lines: Vec<String> = contents.lines().map(str::to_string).collect();
    let mut fields: Vec<String> = lines[2].split(',').map(str::to_string).collect();
    if let Some(last) = fields.last_mut() {
        *last = "\"999\"".to_string();
    }
    lines[2] = fields.join(",");
    fs::write(&csv_path, format!("{}\n", lines.join("\n"))).expect("write csv");

    let err = AuditEngine::new(AuditOptions::default())
        .run(&run_dir)
        .expect_err("strict audit");
    assert!(matches!(err, AuditError::Violations(_)));

    let options = AuditOptions {
        strict: false,
        write_violations: true,
        ..AuditOptions::default()
    };
    let result = AuditEngine::new(options).run(&run_dir).expect("lenient audit");
    assert!(
        result
            .violations
            .iter()
            .any(|violation| violation.code == "sub_category_sum_mismatch")
    );
    assert!(result.violations_path.is_some_and(|path| path.is_file()));
    assert!(result.report.contains("## Top violations"));
}

#[test]
fn standalone_json_export_is_audited_with_inferred_shape() {
    let dir = temp_dir("json");
    let records = enumerate_records(&default_factors(), &mut ChaCha8Rng::seed_from_u64(3));
    let path = dir.join("records.json");
    export_to_path(ExportFormat::Json, &records, &DocumentOptions::default(), &path)
        .expect("export json");

    assert_eq!(load_records(&path).expect("load json"), records);

    let result = AuditEngine::new(AuditOptions::default())
        .run(&path)
        .expect("audit json");
    assert_eq!(result.metrics.shape.origin, "inferred");
    assert_eq!(result.metrics.run_id, "unknown");
    assert_eq!(result.out_dir, dir);
}

#[test]
fn missing_input_is_an_invalid_dataset() {
    let dir = temp_dir("missing");
    let err = AuditEngine::new(AuditOptions::default())
        .run(&dir)
        .expect_err("no exports");
    assert!(matches!(err, AuditError::InvalidDataset(_)));
}

fn temp_dir(label: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("triwise_eval_{label}_{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}
