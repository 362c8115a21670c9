//! Output writers for parsed and aggregated data.
//!
//! This module handles writing data to disk in various formats:
//! - CSV (header row + one line per record)
//! - JSON reports (pretty printed, versioned)
//! - XLSX workbooks
//! - Column-aligned console tables

pub mod csv;
pub mod json;
pub mod table;
pub mod xlsx;

use crate::utils::config::SPREADSHEET_EXTENSIONS;
use crate::utils::error::OutputError;
use log::debug;
use std::path::{Path, PathBuf};

// Re-export main functions
pub use self::csv::{records_to_csv_string, write_csv};
pub use json::{read_report, write_report, ExportReport};
pub use table::{Align, Cell, TableRow, TextTable};
pub use xlsx::write_xlsx;

/// Export format, chosen from the output file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Xlsx,
}

impl ExportFormat {
    /// `.xlsx`/`.xlsm` → workbook, `.json` → JSON report, anything else → CSV
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some(e) if SPREADSHEET_EXTENSIONS.contains(&e) => ExportFormat::Xlsx,
            Some("json") => ExportFormat::Json,
            _ => ExportFormat::Csv,
        }
    }
}

/// Write records in the format implied by `path`
///
/// **Public** - single entry point used by the commands
///
/// # Arguments
/// * `records` - Rows to export
/// * `path` - Destination file
/// * `title` - Sheet name (XLSX) or report kind (JSON)
pub fn export_records<T: TableRow + Clone>(
    records: &[T],
    path: &Path,
    title: &str,
) -> Result<ExportFormat, OutputError> {
    let format = ExportFormat::from_path(path);
    debug!("Exporting {} records as {:?}", records.len(), format);

    match format {
        ExportFormat::Csv => write_csv(records, path)?,
        ExportFormat::Json => write_report(&ExportReport::new(title, records), path)?,
        ExportFormat::Xlsx => write_xlsx(records, path, title)?,
    }

    Ok(format)
}

/// Append `.xlsx` unless the path already has a spreadsheet extension
///
/// # Returns
/// The possibly rewritten path and whether it was changed
pub fn ensure_spreadsheet_extension(path: &Path) -> (PathBuf, bool) {
    let has_ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| SPREADSHEET_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false);

    if has_ext {
        (path.to_path_buf(), false)
    } else {
        let mut raw = path.as_os_str().to_os_string();
        raw.push(".xlsx");
        (PathBuf::from(raw), true)
    }
}

/// Validate that output path is writable
///
/// **Public** - shared by every writer
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    // Check if we're trying to overwrite a directory
    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Validate the path and create missing parent directories
pub fn prepare_output_path(path: &Path) -> Result<(), OutputError> {
    validate_path(path)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}

/// File size in bytes, 0 when unavailable
pub(crate) fn file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}
