//! JSON report writer.
//!
//! Wraps exported records in a versioned envelope.

use super::{file_size, prepare_output_path};
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::OutputError;
use chrono::Utc;
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Top-level structure written to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportReport<T> {
    /// Schema version for compatibility checking
    pub version: String,

    /// What the records describe (e.g. "process-memory")
    pub kind: String,

    /// Timestamp when the report was generated
    pub generated_at: String,

    pub record_count: usize,

    pub records: Vec<T>,
}

impl<T: Clone> ExportReport<T> {
    pub fn new(kind: &str, records: &[T]) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            kind: kind.to_string(),
            generated_at: Utc::now().to_rfc3339(),
            record_count: records.len(),
            records: records.to_vec(),
        }
    }
}

/// Write a report to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_report<T: Serialize>(
    report: &ExportReport<T>,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing report to: {}", output_path.display());

    prepare_output_path(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, report).map_err(OutputError::SerializationFailed)?;

    info!("Report written successfully ({} bytes)", file_size(output_path));

    Ok(())
}

/// Read a report back from a JSON file
///
/// **Public** - useful for validation and testing
pub fn read_report<T: DeserializeOwned>(
    input_path: impl AsRef<Path>,
) -> Result<ExportReport<T>, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading report from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let report: ExportReport<T> =
        serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    debug!(
        "Report loaded: version {}, {} {} records",
        report.version, report.record_count, report.kind
    );

    Ok(report)
}
