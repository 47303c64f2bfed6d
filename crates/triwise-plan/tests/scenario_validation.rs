use std::fs;
use std::path::Path;

use serde_json::json;
use triwise_core::PartitionPolicy;
use triwise_plan::{scenario_json_schema, validate_scenario, validate_scenario_json};

fn load_json(path: &Path) -> serde_json::Value {
    let contents =
        fs::read_to_string(path).unwrap_or_else(|_| panic!("missing json at {}", path.display()));
    serde_json::from_str(&contents).expect("parse json")
}

fn example(name: &str) -> serde_json::Value {
    load_json(&Path::new(env!("CARGO_MANIFEST_DIR")).join(format!("../../scenarios/examples/{name}")))
}

#[test]
fn food_festival_scenario_validates() {
    let scenario_json = example("food_festival.scenario.json");
    let schema = serde_json::to_value(scenario_json_schema()).expect("serialize schema");

    let structural =
        validate_scenario_json(&scenario_json, &schema).expect("validate scenario json schema");
    assert!(structural.errors.is_empty(), "structural errors found");

    let validated = validate_scenario(&scenario_json).expect("scenario validation should succeed");
    assert!(validated.warnings.is_empty(), "unexpected warnings");
    assert_eq!(validated.scenario.seed, Some(42));
    assert_eq!(
        validated.scenario.category_policy(),
        Some(PartitionPolicy::FairBounded { spread: 10 })
    );
}

#[test]
fn generic_aliases_validate_with_skipped_quantity_warning() {
    let validated = validate_scenario(&example("generic.scenario.json"))
        .expect("scenario validation should succeed");
    assert_eq!(validated.warnings.len(), 1);
    assert_eq!(validated.warnings[0].code, "quantity_skipped");
    assert_eq!(validated.warnings[0].path, "/factors/0/values/1");
}

#[test]
fn structural_errors_are_reported() {
    let scenario_json = json!({
        "scenario_version": "0.1",
        "factors": [{ "parameter": "Total Vendor", "values": [50] }]
    });
    let report = validate_scenario(&scenario_json).expect_err("numbers are not tokens");
    assert!(report.has_code("schema_violation"));
}

#[test]
fn unresolved_roles_are_errors() {
    let scenario_json = json!({
        "scenario_version": "0.1",
        "factors": [
            { "parameter": "Count", "values": ["5"] },
            { "parameter": "Kind", "values": ["a"] },
            { "parameter": "Flavor", "values": ["b"] }
        ]
    });
    let report = validate_scenario(&scenario_json).expect_err("roles cannot resolve");
    assert_eq!(
        report
            .errors
            .iter()
            .filter(|issue| issue.code == "role_unresolved")
            .count(),
        3
    );
}

#[test]
fn duplicate_labels_and_bad_policies_are_errors() {
    let scenario_json = json!({
        "scenario_version": "0.1",
        "factors": [
            { "parameter": "Total Vendor", "values": ["2"] },
            { "parameter": "Cuisene Type", "values": ["Malay", "Chinese", "Malay"] },
            { "parameter": "Main Ingredient", "values": ["Fish"] }
        ],
        "options": {
            "sub_category_policy": { "type": "proportional_of_total", "min": 0.8, "max": 0.2 }
        }
    });
    let report = validate_scenario(&scenario_json).expect_err("invalid scenario");
    assert!(report.has_code("duplicate_label"));
    assert!(report.has_code("policy_invalid"));
    assert!(report.has_code("partition_infeasible"));
}

#[test]
fn oversized_quantities_are_errors() {
    let scenario_json = json!({
        "scenario_version": "0.1",
        "factors": [
            { "parameter": "Total Vendor", "values": ["50", "1000000000000"] },
            { "parameter": "Cuisene Type", "values": ["Malay", "Chinese"] },
            { "parameter": "Main Ingredient", "values": ["Fish"] }
        ]
    });
    let report = validate_scenario(&scenario_json).expect_err("quantity over the limit");
    let issue = report
        .errors
        .iter()
        .find(|issue| issue.code == "quantity_too_large")
        .expect("quantity_too_large issue");
    assert_eq!(issue.path, "/factors/0/values/1");
    assert_eq!(report.errors.len(), 1);
}

#[test]
fn version_mismatch_is_an_error() {
    let mut scenario_json = example("food_festival.scenario.json");
    scenario_json["scenario_version"] = json!("9.9");
    let report = validate_scenario(&scenario_json).expect_err("unsupported version");
    assert!(report.has_code("scenario_version_mismatch"));
}
