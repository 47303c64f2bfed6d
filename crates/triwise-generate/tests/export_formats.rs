use std::fs;
use std::path::PathBuf;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use triwise_core::{CombinationRecord, RECORD_FIELDS, default_factors};
use triwise_generate::{
    DocumentOptions, ExportError, ExportFormat, enumerate_records, export_to_path,
};

fn records() -> Vec<CombinationRecord> {
    enumerate_records(&default_factors(), &mut ChaCha8Rng::seed_from_u64(31))
}

#[test]
fn csv_export_has_bare_header_and_quoted_rows() {
    let records = records();
    let path = temp_dir("csv").join("out.csv");
    let bytes = export_to_path(ExportFormat::Csv, &records, &DocumentOptions::default(), &path)
        .expect("export csv");

    let contents = fs::read_to_string(&path).expect("read csv");
    assert_eq!(bytes, contents.len() as u64);
    let lines: Vec<&str> = contents.split_terminator('\n').collect();
    assert_eq!(lines.len(), records.len() + 1);
    assert_eq!(lines[0], RECORD_FIELDS.join(","));
    assert!(!contents.contains('\r'));
    let first = &records[0];
    assert_eq!(
        lines[1],
        format!(
            "\"{}\",\"{}\",\"{}\",\"{}\",\"{}\"",
            first.quantity,
            first.category_total,
            first.category,
            first.sub_category,
            first.sub_category_count
        )
    );
}

#[test]
fn document_export_paginates_groups() {
    let records = records();
    let path = temp_dir("doc").join("nested/out_document.txt");
    let options = DocumentOptions {
        title: "Vendor plan".to_string(),
        page_lines: 24,
    };
    export_to_path(ExportFormat::Document, &records, &options, &path).expect("export document");

    let contents = fs::read_to_string(&path).expect("read document");
    assert!(contents.starts_with("Vendor plan\nTotal combinations: 27\n"));
    for quantity in [50, 80, 120] {
        assert!(contents.contains(&format!("Total Vendor = {quantity}\n")));
    }
    let pages = contents.split('\u{000C}').count();
    assert!(pages > 1);
    assert!(contents.ends_with(&format!("Page {pages} of {pages}\n")));
}

#[test]
fn json_and_text_exports_round_trip_the_rows() {
    let records = records();
    let dir = temp_dir("json_text");

    let json_path = dir.join("out.json");
    export_to_path(ExportFormat::Json, &records, &DocumentOptions::default(), &json_path)
        .expect("export json");
    let parsed: Vec<CombinationRecord> =
        serde_json::from_str(&fs::read_to_string(&json_path).expect("read json")).expect("parse");
    assert_eq!(parsed, records);

    let text_path = dir.join("out.txt");
    export_to_path(ExportFormat::Text, &records, &DocumentOptions::default(), &text_path)
        .expect("export text");
    let text = fs::read_to_string(&text_path).expect("read text");
    assert_eq!(text.lines().count(), records.len() + 1);
    assert_eq!(text.lines().next(), Some(RECORD_FIELDS.join("\t").as_str()));
}

#[test]
fn empty_result_set_writes_nothing() {
    let path = temp_dir("empty").join("out.csv");
    let err = export_to_path(ExportFormat::Csv, &[], &DocumentOptions::default(), &path)
        .expect_err("empty export");
    assert!(matches!(err, ExportError::EmptyResultSet));
    assert!(!path.exists());
}

fn temp_dir(label: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("triwise_export_{label}_{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}
