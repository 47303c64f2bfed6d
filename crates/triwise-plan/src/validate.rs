use std::collections::HashSet;
use std::path::Path;

use jsonschema::JSONSchema;
use serde_json::Value;

use triwise_core::{Factor, FactorRole, MAX_QUANTITY, PartitionPolicy, parse_quantity};

use crate::errors::{IssueSeverity, Result, ScenarioError, ValidationIssue, ValidationReport};
use crate::model::{SCENARIO_VERSION, Scenario};
use crate::schema::scenario_json_schema;

/// Validated scenario with accumulated warnings.
#[derive(Debug, Clone)]
pub struct ValidatedScenario {
    pub scenario: Scenario,
    pub warnings: Vec<ValidationIssue>,
}

/// Validate a scenario JSON document against a scenario JSON Schema.
pub fn validate_scenario_json(
    scenario_json: &Value,
    scenario_schema: &Value,
) -> Result<ValidationReport> {
    let compiled = JSONSchema::compile(scenario_schema)
        .map_err(|err| ScenarioError::Schema(err.to_string()))?;

    let mut report = ValidationReport::default();

    if let Err(errors) = compiled.validate(scenario_json) {
        for error in errors {
            let path = normalized_json_pointer(&error.instance_path.to_string());
            report.push_error(ValidationIssue::new(
                IssueSeverity::Error,
                "schema_violation",
                path,
                error.to_string(),
                None,
            ));
        }
    }

    Ok(report)
}

/// Check roles, labels, quantities and policies of a parsed scenario.
pub fn validate_scenario_semantics(scenario: &Scenario) -> ValidationReport {
    let mut report = ValidationReport::default();

    if scenario.scenario_version != SCENARIO_VERSION {
        report.push_error(ValidationIssue::new(
            IssueSeverity::Error,
            "scenario_version_mismatch",
            "/scenario_version",
            format!(
                "scenario_version '{}' is not supported (expected '{}')",
                scenario.scenario_version, SCENARIO_VERSION
            ),
            Some(format!("set scenario_version to \"{SCENARIO_VERSION}\"")),
        ));
    }

    if scenario.factors.len() != 3 {
        report.push_warning(ValidationIssue::new(
            IssueSeverity::Warning,
            "factor_count",
            "/factors",
            format!(
                "expected exactly three factors, found {}",
                scenario.factors.len()
            ),
            Some("only the first factor matching each role is used".to_string()),
        ));
    }

    validate_roles(&scenario.factors, &mut report);
    validate_policies(scenario, &mut report);

    report
}

/// Validate the scenario end-to-end, returning structured issues on failure.
pub fn validate_scenario(scenario_json: &Value) -> std::result::Result<ValidatedScenario, ValidationReport> {
    let schema = match serde_json::to_value(scenario_json_schema()) {
        Ok(schema) => schema,
        Err(err) => return Err(single_error("schema_validation_error", "/", err.to_string())),
    };

    let structural = match validate_scenario_json(scenario_json, &schema) {
        Ok(report) => report,
        Err(err) => return Err(single_error("schema_validation_error", "/", err.to_string())),
    };

    if !structural.is_ok() {
        return Err(structural);
    }

    let scenario: Scenario = match serde_json::from_value(scenario_json.clone()) {
        Ok(scenario) => scenario,
        Err(err) => return Err(single_error("invalid_scenario_json", "/", err.to_string())),
    };

    let semantic = validate_scenario_semantics(&scenario);
    if !semantic.is_ok() {
        return Err(semantic);
    }

    Ok(ValidatedScenario {
        scenario,
        warnings: semantic.warnings,
    })
}

/// Read and validate a `scenario.json` file.
pub fn load_scenario(path: &Path) -> Result<ValidatedScenario> {
    let contents = std::fs::read_to_string(path)?;
    let json: Value = serde_json::from_str(&contents)?;
    validate_scenario(&json).map_err(ScenarioError::Invalid)
}

fn validate_roles(factors: &[Factor], report: &mut ValidationReport) {
    for (idx, factor) in factors.iter().enumerate() {
        let roles: Vec<&str> = FactorRole::ALL
            .iter()
            .filter(|role| role.matches(&factor.name))
            .map(|role| role.as_str())
            .collect();
        if roles.len() > 1 {
            report.push_warning(ValidationIssue::new(
                IssueSeverity::Warning,
                "factor_matches_multiple_roles",
                format!("/factors/{idx}/parameter"),
                format!(
                    "factor '{}' matches roles {}",
                    factor.name,
                    roles.join(", ")
                ),
                Some("rename the factor so it contains a single role alias".to_string()),
            ));
        }
    }

    let mut category_count = None;
    let mut quantities = Vec::new();

    for role in FactorRole::ALL {
        let matching: Vec<usize> = factors
            .iter()
            .enumerate()
            .filter(|(_, factor)| role.matches(&factor.name))
            .map(|(idx, _)| idx)
            .collect();

        let Some(&idx) = matching.first() else {
            report.push_error(ValidationIssue::new(
                IssueSeverity::Error,
                "role_unresolved",
                "/factors",
                format!("no factor matches the {role} role"),
                Some(format!(
                    "name a factor containing one of: {}",
                    role.aliases().join(", ")
                )),
            ));
            continue;
        };

        if matching.len() > 1 {
            report.push_warning(ValidationIssue::new(
                IssueSeverity::Warning,
                "role_ambiguous",
                format!("/factors/{}", matching[1]),
                format!(
                    "{} factors match the {role} role; '{}' is used",
                    matching.len(),
                    factors[idx].name
                ),
                None,
            ));
        }

        let factor = &factors[idx];
        let base_path = format!("/factors/{idx}");
        if factor.values.is_empty() {
            report.push_error(ValidationIssue::new(
                IssueSeverity::Error,
                "values_empty",
                format!("{base_path}/values"),
                format!("{role} factor '{}' has no values", factor.name),
                Some("add at least one value".to_string()),
            ));
            continue;
        }

        match role {
            FactorRole::Quantity => {
                for (value_idx, token) in factor.values.iter().enumerate() {
                    match parse_quantity(token) {
                        Some(quantity) if quantity > MAX_QUANTITY => {
                            report.push_error(ValidationIssue::new(
                                IssueSeverity::Error,
                                "quantity_too_large",
                                format!("{base_path}/values/{value_idx}"),
                                format!("quantity {quantity} exceeds the limit of {MAX_QUANTITY}"),
                                Some("split the quantity across several runs".to_string()),
                            ));
                        }
                        Some(quantity) => quantities.push((value_idx, quantity)),
                        None => report.push_warning(ValidationIssue::new(
                            IssueSeverity::Warning,
                            "quantity_skipped",
                            format!("{base_path}/values/{value_idx}"),
                            format!("'{token}' is not a positive integer and yields no records"),
                            None,
                        )),
                    }
                }
            }
            FactorRole::Category | FactorRole::SubCategory => {
                let mut seen = HashSet::new();
                for (value_idx, label) in factor.values.iter().enumerate() {
                    if !seen.insert(label.as_str()) {
                        report.push_error(ValidationIssue::new(
                            IssueSeverity::Error,
                            "duplicate_label",
                            format!("{base_path}/values/{value_idx}"),
                            format!("label '{label}' is declared twice in '{}'", factor.name),
                            Some("bucket labels must be unique".to_string()),
                        ));
                    }
                }
                if role == FactorRole::Category {
                    category_count = Some((idx, factor.values.len()));
                }
            }
        }
    }

    if let Some((category_idx, buckets)) = category_count {
        for (value_idx, quantity) in quantities {
            if (quantity as usize) < buckets {
                report.push_warning(ValidationIssue::new(
                    IssueSeverity::Warning,
                    "partition_infeasible",
                    format!("/factors/{category_idx}/values"),
                    format!(
                        "quantity {quantity} (value {value_idx}) cannot give each of {buckets} categories one unit; the allocation will exceed it"
                    ),
                    Some("raise the quantity or drop categories".to_string()),
                ));
            }
        }
    }
}

fn validate_policies(scenario: &Scenario, report: &mut ValidationReport) {
    let policies: [(&str, Option<PartitionPolicy>); 2] = [
        ("/options/category_policy", scenario.category_policy()),
        ("/options/sub_category_policy", scenario.sub_category_policy()),
    ];

    for (path, policy) in policies {
        let Some(policy) = policy else {
            continue;
        };
        if let Err(err) = policy.validate() {
            report.push_error(ValidationIssue::new(
                IssueSeverity::Error,
                "policy_invalid",
                path,
                err.to_string(),
                Some("use proportions within [0, 1] with min <= max".to_string()),
            ));
        }
    }
}

fn single_error(code: &str, path: &str, message: String) -> ValidationReport {
    let mut report = ValidationReport::default();
    report.push_error(ValidationIssue::new(
        IssueSeverity::Error,
        code,
        path,
        message,
        None,
    ));
    report
}

fn normalized_json_pointer(pointer: &str) -> String {
    if pointer.is_empty() {
        "/".to_string()
    } else {
        pointer.to_string()
    }
}
