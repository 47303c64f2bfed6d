use std::env;
use std::path::PathBuf;

use triwise_plan::{ScenarioError, ValidationReport, load_scenario};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let scenario_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .ok_or("missing scenario path")?;

    let validated = match load_scenario(&scenario_path) {
        Ok(validated) => validated,
        Err(ScenarioError::Invalid(report)) => {
            eprintln!("scenario validation failed");
            print_report(&report);
            std::process::exit(1);
        }
        Err(err) => return Err(err.into()),
    };

    if !validated.warnings.is_empty() {
        eprintln!("scenario validated with warnings:");
        print_report(&ValidationReport {
            errors: Vec::new(),
            warnings: validated.warnings,
        });
    } else {
        println!("scenario validated successfully");
    }

    Ok(())
}

fn print_report(report: &ValidationReport) {
    for issue in &report.errors {
        eprintln!("error {} {}: {}", issue.code, issue.path, issue.message);
        if let Some(hint) = &issue.hint {
            eprintln!("  hint: {hint}");
        }
    }
    for issue in &report.warnings {
        eprintln!("warning {} {}: {}", issue.code, issue.path, issue.message);
        if let Some(hint) = &issue.hint {
            eprintln!("  hint: {hint}");
        }
    }
}
