use std::collections::BTreeSet;

use triwise_core::{CombinationRecord, group_records};

use crate::metrics::{CheckSummary, WarningItem};
use crate::model::{Shape, Violation};

/// Checks, violations and warnings produced by [`audit_records`].
#[derive(Debug, Clone, Default)]
pub struct AuditOutcome {
    pub checks: CheckSummary,
    pub violations: Vec<Violation>,
    pub warnings: Vec<WarningItem>,
    pub quantity_groups: u64,
    pub category_blocks: u64,
    pub documented_over_allocations: u64,
}

/// Distinct category and sub-category labels found in `records`.
pub fn infer_shape(records: &[CombinationRecord]) -> Shape {
    let categories: BTreeSet<&str> = records.iter().map(|r| r.category.as_str()).collect();
    let sub_categories: BTreeSet<&str> = records.iter().map(|r| r.sub_category.as_str()).collect();
    Shape {
        categories: categories.len(),
        sub_categories: sub_categories.len(),
    }
}

enum SumOutcome {
    Exact,
    /// Every bucket holds one unit because the total was below the bucket count.
    Documented,
    Mismatch,
}

fn classify_sum(total: u64, counts: &[u64]) -> SumOutcome {
    let sum: u64 = counts.iter().sum();
    if sum == total {
        SumOutcome::Exact
    } else if (total as usize) < counts.len() && counts.iter().all(|count| *count == 1) {
        SumOutcome::Documented
    } else {
        SumOutcome::Mismatch
    }
}

/// Re-check the allocation invariants of a result set.
pub fn audit_records(records: &[CombinationRecord], shape: Shape) -> AuditOutcome {
    let mut outcome = AuditOutcome::default();

    for (idx, record) in records.iter().enumerate() {
        let ok = record.category_total >= 1 && record.sub_category_count >= 1;
        outcome.checks.minimum_counts.record(ok);
        if !ok {
            outcome.violations.push(Violation {
                code: "count_below_minimum".to_string(),
                path: format!("/records/{idx}"),
                message: "every category total and sub-category count must be at least 1"
                    .to_string(),
                row_index: Some(idx as u64),
                example: Some(example(record)),
            });
        }
    }

    for (idx, pair) in records.windows(2).enumerate() {
        let (prev, record) = (&pair[0], &pair[1]);
        if prev.quantity != record.quantity || prev.category != record.category {
            continue;
        }
        let ok = prev.category_total == record.category_total;
        outcome.checks.category_total_consistency.record(ok);
        if !ok {
            outcome.violations.push(Violation {
                code: "category_total_inconsistent".to_string(),
                path: format!("/records/{}", idx + 1),
                message: format!(
                    "category '{}' carries total {} after {}",
                    record.category, record.category_total, prev.category_total
                ),
                row_index: Some(idx as u64 + 1),
                example: Some(example(record)),
            });
        }
    }

    let groups = group_records(records);
    outcome.quantity_groups = groups.len() as u64;
    let mut offset = 0_u64;

    for (group_idx, group) in groups.iter().enumerate() {
        let group_path = format!("/groups/{group_idx}");
        outcome.category_blocks += group.categories.len() as u64;

        let category_counts: Vec<u64> = group
            .categories
            .iter()
            .map(|block| block.category_total)
            .collect();
        match classify_sum(group.quantity, &category_counts) {
            SumOutcome::Exact => outcome.checks.category_sums.record(true),
            SumOutcome::Documented => {
                outcome.checks.category_sums.record(true);
                outcome.documented_over_allocations += 1;
                outcome.warnings.push(over_allocation_warning(
                    &group_path,
                    group.quantity,
                    group.category_sum(),
                ));
            }
            SumOutcome::Mismatch => {
                outcome.checks.category_sums.record(false);
                outcome.violations.push(Violation {
                    code: "category_sum_mismatch".to_string(),
                    path: group_path.clone(),
                    message: format!(
                        "category totals sum to {} for quantity {}",
                        group.category_sum(),
                        group.quantity
                    ),
                    row_index: Some(offset),
                    example: None,
                });
            }
        }

        let mut block_offset = offset;
        for block in &group.categories {
            let block_path = format!("{group_path}/{}", block.category);
            let counts: Vec<u64> = block
                .records
                .iter()
                .map(|record| record.sub_category_count)
                .collect();
            match classify_sum(block.category_total, &counts) {
                SumOutcome::Exact => outcome.checks.sub_category_sums.record(true),
                SumOutcome::Documented => {
                    outcome.checks.sub_category_sums.record(true);
                    outcome.documented_over_allocations += 1;
                    outcome.warnings.push(over_allocation_warning(
                        &block_path,
                        block.category_total,
                        block.sub_category_sum(),
                    ));
                }
                SumOutcome::Mismatch => {
                    outcome.checks.sub_category_sums.record(false);
                    outcome.violations.push(Violation {
                        code: "sub_category_sum_mismatch".to_string(),
                        path: block_path,
                        message: format!(
                            "sub-category counts sum to {} for category total {}",
                            block.sub_category_sum(),
                            block.category_total
                        ),
                        row_index: Some(block_offset),
                        example: block.records.first().map(|record| example(record)),
                    });
                }
            }
            block_offset += block.records.len() as u64;
        }

        let ok = group.categories.len() == shape.categories
            && group
                .categories
                .iter()
                .all(|block| block.records.len() == shape.sub_categories);
        outcome.checks.cardinality.record(ok);
        if !ok {
            outcome.violations.push(Violation {
                code: "cardinality_mismatch".to_string(),
                path: group_path,
                message: format!(
                    "quantity {} has {} record(s) in {} block(s), expected {} x {}",
                    group.quantity,
                    group.record_count(),
                    group.categories.len(),
                    shape.categories,
                    shape.sub_categories
                ),
                row_index: Some(offset),
                example: None,
            });
        }

        offset += group.record_count() as u64;
    }

    outcome
}

fn over_allocation_warning(path: &str, total: u64, allocated: u64) -> WarningItem {
    WarningItem {
        code: "documented_over_allocation".to_string(),
        path: path.to_string(),
        message: format!("total {total} was below the bucket count; allocated {allocated}"),
        hint: Some("raise the total or reduce the number of labels".to_string()),
    }
}

fn example(record: &CombinationRecord) -> String {
    record.to_fields().join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(quantity: u64, total: u64, category: &str, sub: &str, count: u64) -> CombinationRecord {
        CombinationRecord {
            quantity,
            category_total: total,
            category: category.to_string(),
            sub_category: sub.to_string(),
            sub_category_count: count,
        }
    }

    fn valid() -> Vec<CombinationRecord> {
        vec![
            record(10, 6, "a", "x", 4),
            record(10, 6, "a", "y", 2),
            record(10, 4, "b", "x", 1),
            record(10, 4, "b", "y", 3),
        ]
    }

    const SHAPE: Shape = Shape {
        categories: 2,
        sub_categories: 2,
    };

    #[test]
    fn clean_records_pass() {
        let outcome = audit_records(&valid(), SHAPE);
        assert!(outcome.violations.is_empty(), "{:?}", outcome.violations);
        assert_eq!(outcome.quantity_groups, 1);
        assert_eq!(outcome.category_blocks, 2);
        assert_eq!(outcome.checks.minimum_counts.checked, 4);
        assert_eq!(outcome.checks.category_total_consistency.checked, 2);
    }

    #[test]
    fn tampered_count_is_a_sub_category_mismatch() {
        let mut records = valid();
        records[1].sub_category_count = 5;
        let outcome = audit_records(&records, SHAPE);
        assert_eq!(outcome.violations.len(), 1);
        assert_eq!(outcome.violations[0].code, "sub_category_sum_mismatch");
        assert_eq!(outcome.violations[0].path, "/groups/0/a");
        assert_eq!(outcome.violations[0].row_index, Some(0));
    }

    #[test]
    fn tampered_total_is_inconsistent() {
        let mut records = valid();
        records[3].category_total = 5;
        let outcome = audit_records(&records, SHAPE);
        let codes: BTreeSet<&str> = outcome
            .violations
            .iter()
            .map(|violation| violation.code.as_str())
            .collect();
        assert!(codes.contains("category_total_inconsistent"), "{codes:?}");
        assert_eq!(
            outcome.violations[0].row_index,
            Some(3),
            "{:?}",
            outcome.violations
        );
    }

    #[test]
    fn zero_counts_are_below_minimum() {
        let records = vec![record(1, 1, "a", "x", 0)];
        let outcome = audit_records(
            &records,
            Shape {
                categories: 1,
                sub_categories: 1,
            },
        );
        assert!(
            outcome
                .violations
                .iter()
                .any(|violation| violation.code == "count_below_minimum")
        );
    }

    #[test]
    fn infeasible_splits_are_warnings() {
        let records = vec![
            record(2, 1, "a", "x", 1),
            record(2, 1, "b", "x", 1),
            record(2, 1, "c", "x", 1),
        ];
        let outcome = audit_records(
            &records,
            Shape {
                categories: 3,
                sub_categories: 1,
            },
        );
        assert!(outcome.violations.is_empty(), "{:?}", outcome.violations);
        assert_eq!(outcome.documented_over_allocations, 1);
        assert_eq!(outcome.warnings[0].code, "documented_over_allocation");
    }

    #[test]
    fn missing_rows_break_cardinality() {
        let mut records = valid();
        records.pop();
        let outcome = audit_records(&records, SHAPE);
        assert!(
            outcome
                .violations
                .iter()
                .any(|violation| violation.code == "cardinality_mismatch")
        );
    }

    #[test]
    fn shape_is_inferred_from_labels() {
        assert_eq!(infer_shape(&valid()), SHAPE);
    }
}
