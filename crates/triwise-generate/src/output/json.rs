use std::io::Write;

use triwise_core::CombinationRecord;

use super::ExportError;

/// Pretty JSON array of records followed by a newline.
pub fn write_json<W: Write>(mut writer: W, records: &[CombinationRecord]) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
