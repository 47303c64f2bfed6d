use crate::metrics::{AuditMetrics, CheckStats};
use crate::model::Violation;

/// Render a deterministic markdown report from metrics and violations.
pub fn render_report(metrics: &AuditMetrics, violations: &[Violation], max_examples: usize) -> String {
    let mut lines = Vec::new();

    lines.push("# Triwise Audit Report".to_string());
    lines.push(String::new());
    lines.push("## Run summary".to_string());
    lines.push(format!("- run_id: {}", metrics.run_id));
    if let Some(seed) = metrics.seed {
        lines.push(format!("- seed: {seed}"));
    }
    lines.push(format!("- source: {}", metrics.source));
    lines.push(format!("- records: {}", metrics.records));
    lines.push(format!("- quantity_groups: {}", metrics.quantity_groups));
    lines.push(format!(
        "- shape: {} categories x {} sub-categories ({})",
        metrics.shape.categories, metrics.shape.sub_categories, metrics.shape.origin
    ));
    lines.push(String::new());

    lines.push("## Invariant summary".to_string());
    lines.push("| check | checked | violations |".to_string());
    lines.push("| --- | --- | --- |".to_string());
    let checks = &metrics.checks;
    push_check_row(&mut lines, "category_total_consistency", &checks.category_total_consistency);
    push_check_row(&mut lines, "category_sums", &checks.category_sums);
    push_check_row(&mut lines, "sub_category_sums", &checks.sub_category_sums);
    push_check_row(&mut lines, "minimum_counts", &checks.minimum_counts);
    push_check_row(&mut lines, "cardinality", &checks.cardinality);
    lines.push(String::new());

    if !metrics.warnings.is_empty() {
        lines.push("## Warnings".to_string());
        for warning in &metrics.warnings {
            let hint = warning
                .hint
                .as_ref()
                .map(|hint| format!(" (hint: {hint})"))
                .unwrap_or_default();
            lines.push(format!("- {}: {}{}", warning.path, warning.message, hint));
        }
        lines.push(String::new());
    }

    if !violations.is_empty() {
        lines.push("## Top violations".to_string());
        for violation in violations.iter().take(max_examples) {
            let row = violation
                .row_index
                .map(|row| format!(" row {row}"))
                .unwrap_or_default();
            let example = violation
                .example
                .as_ref()
                .map(|value| format!(" example={value}"))
                .unwrap_or_default();
            lines.push(format!(
                "- [{}] {}{}: {}{}",
                violation.code, violation.path, row, violation.message, example
            ));
        }
        lines.push(String::new());
    }

    lines.push("## Recommendations".to_string());
    lines.extend(recommendations(metrics, violations));
    lines.join("\n")
}

fn push_check_row(lines: &mut Vec<String>, name: &str, stats: &CheckStats) {
    lines.push(format!(
        "| {} | {} | {} |",
        name, stats.checked, stats.violations
    ));
}

fn recommendations(metrics: &AuditMetrics, violations: &[Violation]) -> Vec<String> {
    let mut lines = Vec::new();
    let checks = &metrics.checks;
    if checks.category_total_consistency.violations > 0 {
        lines.push("- a category block carries different totals; the export was edited or reordered.".to_string());
    }
    if checks.category_sums.violations > 0 || checks.sub_category_sums.violations > 0 {
        lines.push("- regenerate from the recorded seed and compare the fingerprint.".to_string());
    }
    if checks.cardinality.violations > 0 {
        lines.push("- rows are missing or duplicated; check the label lists against the scenario.".to_string());
    }
    if metrics.documented_over_allocations > 0 {
        lines.push("- some totals were smaller than their bucket count; raise them to avoid over-allocation.".to_string());
    }
    if violations.is_empty() {
        lines.push("- no violations detected.".to_string());
    }
    lines
}
