//! Export of a result set to CSV, tab-separated text, a paginated text
//! document and JSON.

pub mod csv;
pub mod document;
pub mod json;
pub mod text;

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use triwise_core::CombinationRecord;

pub use document::{DocumentOptions, render_document};

/// Errors raised while exporting a result set.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no combinations to export; generate a result set first")]
    EmptyResultSet,
    #[error("export target '{}' is not a writable file path", .0.display())]
    MissingTarget(PathBuf),
    #[error("unknown export format '{0}' (expected csv, text, document or json)")]
    UnknownFormat(String),
    #[error("invalid document options: {0}")]
    InvalidDocument(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Csv,
    Text,
    Document,
    Json,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Csv,
        ExportFormat::Text,
        ExportFormat::Document,
        ExportFormat::Json,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Text => "text",
            ExportFormat::Document => "document",
            ExportFormat::Json => "json",
        }
    }

    /// Artifact file name inside a run directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "combinations.csv",
            ExportFormat::Text => "combinations.txt",
            ExportFormat::Document => "combinations_document.txt",
            ExportFormat::Json => "combinations.json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "text" | "txt" | "tsv" => Ok(ExportFormat::Text),
            "document" | "doc" => Ok(ExportFormat::Document),
            "json" => Ok(ExportFormat::Json),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}

/// Serialize `records` in `format` into `writer`.
pub fn write_records<W: Write>(
    format: ExportFormat,
    records: &[CombinationRecord],
    document: &DocumentOptions,
    writer: W,
) -> Result<(), ExportError> {
    if records.is_empty() {
        return Err(ExportError::EmptyResultSet);
    }
    match format {
        ExportFormat::Csv => csv::write_csv(writer, records),
        ExportFormat::Text => text::write_text(writer, records),
        ExportFormat::Document => document::write_document(writer, records, document),
        ExportFormat::Json => json::write_json(writer, records),
    }
}

/// Export `records` to `path`, creating parent directories. Returns the
/// number of bytes written.
pub fn export_to_path(
    format: ExportFormat,
    records: &[CombinationRecord],
    document: &DocumentOptions,
    path: &Path,
) -> Result<u64, ExportError> {
    if records.is_empty() {
        return Err(ExportError::EmptyResultSet);
    }
    if path.as_os_str().is_empty() || path.is_dir() {
        return Err(ExportError::MissingTarget(path.to_path_buf()));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut counting = CountingWriter::new(BufWriter::new(File::create(path)?));
    write_records(format, records, document, &mut counting)?;
    counting.flush()?;
    Ok(counting.bytes_written())
}

pub(crate) struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    pub(crate) fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    pub(crate) fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> CombinationRecord {
        CombinationRecord {
            quantity: 50,
            category_total: 18,
            category: "Malay".to_string(),
            sub_category: "Chicken".to_string(),
            sub_category_count: 7,
        }
    }

    #[test]
    fn formats_parse_aliases() {
        assert_eq!("TXT".parse::<ExportFormat>().ok(), Some(ExportFormat::Text));
        assert_eq!("doc".parse::<ExportFormat>().ok(), Some(ExportFormat::Document));
        assert!(matches!(
            "pdf".parse::<ExportFormat>(),
            Err(ExportError::UnknownFormat(_))
        ));
    }

    #[test]
    fn empty_result_set_is_rejected() {
        let err = write_records(
            ExportFormat::Json,
            &[],
            &DocumentOptions::default(),
            Vec::new(),
        )
        .expect_err("empty export");
        assert!(matches!(err, ExportError::EmptyResultSet));
    }

    #[test]
    fn directory_target_is_rejected() {
        let dir = std::env::temp_dir();
        let err = export_to_path(
            ExportFormat::Csv,
            &[record()],
            &DocumentOptions::default(),
            &dir,
        )
        .expect_err("directory target");
        assert!(matches!(err, ExportError::MissingTarget(_)));

        let err = export_to_path(
            ExportFormat::Csv,
            &[record()],
            &DocumentOptions::default(),
            Path::new(""),
        )
        .expect_err("empty target");
        assert!(matches!(err, ExportError::MissingTarget(_)));
    }

    #[test]
    fn counting_writer_tracks_bytes() {
        let mut counting = CountingWriter::new(Vec::new());
        counting.write_all(b"hello").expect("write");
        assert_eq!(counting.bytes_written(), 5);
    }
}
