//! CSV writer.
//!
//! Always writes the header row, even for an empty record set.

use super::table::TableRow;
use super::{file_size, prepare_output_path};
use crate::utils::error::OutputError;
use ::csv::WriterBuilder;
use log::info;
use std::io::Write;
use std::path::Path;

/// Write records to a CSV file
///
/// # Errors
/// * `OutputError::InvalidPath` - Path is empty or a directory
/// * `OutputError::CsvFailed` - Serialization or I/O error
pub fn write_csv<T: TableRow>(
    records: &[T],
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();
    info!("Writing CSV to: {}", output_path.display());

    prepare_output_path(output_path)?;

    let file = std::fs::File::create(output_path)?;
    write_records(records, file)?;

    info!("CSV written successfully ({} bytes)", file_size(output_path));
    Ok(())
}

/// Render records as CSV text (for tests and piping)
pub fn records_to_csv_string<T: TableRow>(records: &[T]) -> Result<String, OutputError> {
    let mut buffer = Vec::new();
    write_records(records, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| OutputError::InvalidPath(format!("Non UTF-8 CSV output: {}", e)))
}

fn write_records<T: TableRow, W: Write>(records: &[T], sink: W) -> Result<(), OutputError> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(sink);

    writer.write_record(T::HEADERS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}
