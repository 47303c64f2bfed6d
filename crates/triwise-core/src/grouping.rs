use serde::Serialize;

use crate::record::CombinationRecord;

/// Records of one category inside a quantity group.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryGroup<'a> {
    pub category: &'a str,
    pub category_total: u64,
    pub records: Vec<&'a CombinationRecord>,
}

impl CategoryGroup<'_> {
    pub fn sub_category_sum(&self) -> u64 {
        self.records
            .iter()
            .map(|record| record.sub_category_count)
            .sum()
    }
}

/// Records produced from one quantity value.
#[derive(Debug, Clone, Serialize)]
pub struct QuantityGroup<'a> {
    pub quantity: u64,
    pub categories: Vec<CategoryGroup<'a>>,
}

impl QuantityGroup<'_> {
    pub fn category_sum(&self) -> u64 {
        self.categories
            .iter()
            .map(|group| group.category_total)
            .sum()
    }

    pub fn record_count(&self) -> usize {
        self.categories.iter().map(|group| group.records.len()).sum()
    }
}

/// Group records by consecutive quantity, then by consecutive category.
///
/// Groups follow emission order rather than keys, so a quantity listed twice
/// stays two groups: a block restarts when a sub-category repeats inside the
/// current category, and a quantity group restarts when a category repeats.
pub fn group_records(records: &[CombinationRecord]) -> Vec<QuantityGroup<'_>> {
    let mut groups: Vec<QuantityGroup<'_>> = Vec::new();

    for record in records {
        let continues_block = groups
            .last()
            .and_then(|group| group.categories.last())
            .is_some_and(|block| {
                block.category == record.category
                    && block.category_total == record.category_total
                    && !block
                        .records
                        .iter()
                        .any(|seen| seen.sub_category == record.sub_category)
            });

        if continues_block {
            if let Some(block) = groups
                .last_mut()
                .and_then(|group| group.categories.last_mut())
            {
                block.records.push(record);
            }
            continue;
        }

        let continues_group = groups.last().is_some_and(|group| {
            group.quantity == record.quantity
                && !group
                    .categories
                    .iter()
                    .any(|block| block.category == record.category)
        });
        if !continues_group {
            groups.push(QuantityGroup {
                quantity: record.quantity,
                categories: Vec::new(),
            });
        }

        if let Some(group) = groups.last_mut() {
            group.categories.push(CategoryGroup {
                category: &record.category,
                category_total: record.category_total,
                records: vec![record],
            });
        }
    }

    groups
}
