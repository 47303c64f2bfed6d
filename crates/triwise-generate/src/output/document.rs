use std::io::Write;

use serde::{Deserialize, Serialize};

use triwise_core::{CombinationRecord, QuantityGroup, group_records};

use super::ExportError;

pub const DEFAULT_TITLE: &str = "Food Festival Vendor Distribution";
pub const DEFAULT_PAGE_LINES: usize = 60;
/// A group heading never starts within this many lines of the page end.
pub const HEADING_KEEP_LINES: usize = 10;
/// Blank line plus "Page i of n".
const FOOTER_LINES: usize = 2;
const MIN_PAGE_LINES: usize = HEADING_KEEP_LINES + FOOTER_LINES + 4;
const PAGE_BREAK: char = '\u{000C}';

const COLUMNS: [&str; 4] = [
    "Number of vendor",
    "Cuisine Type",
    "Main Ingredient",
    "No. of vendor per ingredient",
];

/// Layout options for the paginated document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentOptions {
    pub title: String,
    /// Lines per page, footer included.
    pub page_lines: usize,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            page_lines: DEFAULT_PAGE_LINES,
        }
    }
}

pub fn write_document<W: Write>(
    mut writer: W,
    records: &[CombinationRecord],
    options: &DocumentOptions,
) -> Result<(), ExportError> {
    let rendered = render_document(records, options)?;
    writer.write_all(rendered.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Render records as pages of plain text.
///
/// Each quantity group gets a "Total Vendor = Q" heading and a table. The
/// category cells of a block are printed on its first row only, and again
/// when the block continues on a new page, where the column header is
/// repeated too. Pages are separated by a form feed.
pub fn render_document(
    records: &[CombinationRecord],
    options: &DocumentOptions,
) -> Result<String, ExportError> {
    if records.is_empty() {
        return Err(ExportError::EmptyResultSet);
    }
    if options.page_lines < MIN_PAGE_LINES {
        return Err(ExportError::InvalidDocument(format!(
            "page_lines must be at least {MIN_PAGE_LINES}, got {}",
            options.page_lines
        )));
    }

    let groups = group_records(records);
    let widths = column_widths(&groups);
    let mut pages = Paginator::new(options.page_lines - FOOTER_LINES);

    pages.push(options.title.clone());
    pages.push(format!("Total combinations: {}", records.len()));

    for group in &groups {
        if !pages.at_page_start() && pages.remaining() > 0 {
            pages.push(String::new());
        }
        if !pages.at_page_start() && pages.remaining() <= HEADING_KEEP_LINES {
            pages.break_page();
        }
        pages.push(format!("Total Vendor = {}", group.quantity));
        push_table_header(&mut pages, &widths);

        for block in &group.categories {
            let total = block.category_total.to_string();
            for (idx, record) in block.records.iter().enumerate() {
                let continued = pages.remaining() == 0;
                if continued {
                    pages.break_page();
                    push_table_header(&mut pages, &widths);
                }
                let (total_cell, category_cell) = if idx == 0 || continued {
                    (total.as_str(), block.category)
                } else {
                    ("", "")
                };
                let count = record.sub_category_count.to_string();
                pages.push(table_row(
                    [total_cell, category_cell, &record.sub_category, &count],
                    &widths,
                ));
            }
        }
    }

    Ok(pages.finish())
}

fn column_widths(groups: &[QuantityGroup<'_>]) -> [usize; 4] {
    let mut widths = COLUMNS.map(|column| column.chars().count());
    for group in groups {
        for block in &group.categories {
            widths[0] = widths[0].max(block.category_total.to_string().len());
            widths[1] = widths[1].max(block.category.chars().count());
            for record in &block.records {
                widths[2] = widths[2].max(record.sub_category.chars().count());
                widths[3] = widths[3].max(record.sub_category_count.to_string().len());
            }
        }
    }
    widths
}

fn push_table_header(pages: &mut Paginator, widths: &[usize; 4]) {
    pages.push(table_row(COLUMNS, widths));
    pages.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
}

fn table_row(cells: [&str; 4], widths: &[usize; 4]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}", width = *width))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}

struct Paginator {
    body_lines: usize,
    pages: Vec<Vec<String>>,
    current: Vec<String>,
}

impl Paginator {
    fn new(body_lines: usize) -> Self {
        Self {
            body_lines,
            pages: Vec::new(),
            current: Vec::with_capacity(body_lines),
        }
    }

    fn remaining(&self) -> usize {
        self.body_lines - self.current.len()
    }

    fn at_page_start(&self) -> bool {
        self.current.is_empty()
    }

    fn push(&mut self, line: String) {
        if self.remaining() == 0 {
            self.break_page();
        }
        self.current.push(line);
    }

    fn break_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
    }

    fn finish(mut self) -> String {
        if !self.current.is_empty() {
            self.break_page();
        }
        let total = self.pages.len();
        let mut out = String::new();
        for (idx, page) in self.pages.iter().enumerate() {
            if idx > 0 {
                out.push(PAGE_BREAK);
            }
            for line in page {
                out.push_str(line);
                out.push('\n');
            }
            out.push('\n');
            out.push_str(&format!("Page {} of {total}\n", idx + 1));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(quantity: u64, categories: &[(&str, u64)], subs: &[&str]) -> Vec<CombinationRecord> {
        let mut out = Vec::new();
        for (category, total) in categories {
            for sub in subs {
                out.push(CombinationRecord {
                    quantity,
                    category_total: *total,
                    category: category.to_string(),
                    sub_category: sub.to_string(),
                    sub_category_count: 1,
                });
            }
        }
        out
    }

    #[test]
    fn category_cells_print_on_first_row_of_block() {
        let records = records(
            50,
            &[("Malay", 18), ("Chinese", 16)],
            &["Chicken", "Fish", "Vegetable"],
        );
        let doc = render_document(&records, &DocumentOptions::default()).expect("render");
        let lines: Vec<&str> = doc.lines().collect();

        assert_eq!(lines[0], DEFAULT_TITLE);
        assert_eq!(lines[1], "Total combinations: 6");
        assert!(lines.contains(&"Total Vendor = 50"));
        assert_eq!(lines.iter().filter(|line| line.contains("Malay")).count(), 1);
        assert_eq!(lines.iter().filter(|line| line.contains("Chinese")).count(), 1);
        let fish = lines
            .iter()
            .find(|line| line.contains("Fish"))
            .expect("fish row");
        assert!(fish.starts_with(' '), "{fish}");
        assert!(doc.ends_with("Page 1 of 1\n"));
    }

    #[test]
    fn long_documents_paginate_with_footers() {
        let mut all = Vec::new();
        for quantity in [50, 80, 120, 200, 300] {
            all.extend(records(
                quantity,
                &[("Malay", 10), ("Chinese", 10), ("Indian", 10)],
                &["Chicken", "Fish", "Vegetable"],
            ));
        }
        let options = DocumentOptions {
            page_lines: 20,
            ..DocumentOptions::default()
        };
        let doc = render_document(&all, &options).expect("render");
        let pages: Vec<&str> = doc.split(PAGE_BREAK).collect();
        assert!(pages.len() > 1);
        for (idx, page) in pages.iter().enumerate() {
            assert!(page.lines().count() <= options.page_lines, "page {idx}");
            assert!(page.ends_with(&format!("Page {} of {}\n", idx + 1, pages.len())));
            let body_lines = options.page_lines - FOOTER_LINES;
            for (line_idx, line) in page.lines().enumerate() {
                if line.starts_with("Total Vendor = ") {
                    assert!(
                        body_lines - line_idx > HEADING_KEEP_LINES,
                        "heading too close to page end on page {idx}"
                    );
                }
            }
        }
    }

    #[test]
    fn tiny_pages_are_rejected() {
        let records = records(5, &[("a", 5)], &["x"]);
        let options = DocumentOptions {
            page_lines: 5,
            ..DocumentOptions::default()
        };
        assert!(matches!(
            render_document(&records, &options),
            Err(ExportError::InvalidDocument(_))
        ));
    }
}
