use std::io::Write;

use csv::{QuoteStyle, Terminator, WriterBuilder};

use triwise_core::{CombinationRecord, RECORD_FIELDS};

use super::ExportError;

/// Tab-separated rows with a header line.
pub fn write_text<W: Write>(writer: W, records: &[CombinationRecord]) -> Result<(), ExportError> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .delimiter(b'\t')
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);
    writer.write_record(RECORD_FIELDS)?;
    for record in records {
        writer.write_record(record.to_fields())?;
    }
    writer.flush()?;
    Ok(())
}
