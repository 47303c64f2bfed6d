use std::io::Write;

use csv::{QuoteStyle, Terminator, WriterBuilder};

use triwise_core::{CombinationRecord, RECORD_FIELDS};

use super::ExportError;

/// Write records as CSV: an unquoted header of the record field names, then
/// one fully quoted row per record, each ending in `\n`.
pub fn write_csv<W: Write>(writer: W, records: &[CombinationRecord]) -> Result<(), ExportError> {
    let mut header = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);
    header.write_record(RECORD_FIELDS)?;
    header.flush()?;
    let writer = header.into_inner().map_err(|err| err.into_error())?;

    let mut rows = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);
    for record in records {
        rows.write_record(record.to_fields())?;
    }
    rows.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_is_bare_and_fields_are_quoted() {
        let records = vec![CombinationRecord {
            quantity: 50,
            category_total: 18,
            category: "Malay".to_string(),
            sub_category: "Chicken \"kampung\", grilled".to_string(),
            sub_category_count: 7,
        }];
        let mut out = Vec::new();
        write_csv(&mut out, &records).expect("write csv");
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(
            text,
            "Total Vendor,Number of vendor,Cuisene Type,Main Ingredient,No. of vendor per ingredient\n\
             \"50\",\"18\",\"Malay\",\"Chicken \"\"kampung\"\", grilled\",\"7\"\n"
        );
    }
}
