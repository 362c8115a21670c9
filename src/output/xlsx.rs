//! XLSX workbook writer.
//!
//! One worksheet: bold, centred header row, then one row per record.
//! Columns are sized to the longest value plus two characters.

use super::table::{Cell, TableRow};
use super::{file_size, prepare_output_path};
use crate::utils::error::OutputError;
use log::info;
use rust_xlsxwriter::{Format, FormatAlign, Workbook};
use std::path::Path;

/// Excel limits sheet names to 31 characters
const MAX_SHEET_NAME: usize = 31;

/// Write records to a workbook
///
/// # Arguments
/// * `records` - Rows to write
/// * `output_path` - Destination `.xlsx`/`.xlsm` file
/// * `sheet_name` - Worksheet title
pub fn write_xlsx<T: TableRow>(
    records: &[T],
    output_path: impl AsRef<Path>,
    sheet_name: &str,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();
    info!("Writing workbook to: {}", output_path.display());

    prepare_output_path(output_path)?;

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_title(sheet_name))?;

    let header_format = Format::new().set_bold().set_align(FormatAlign::Center);
    let mut widths: Vec<usize> = T::HEADERS.iter().map(|h| h.chars().count()).collect();

    for (col, header) in T::HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;

        for (col, cell) in record.cells().into_iter().enumerate() {
            if let Some(width) = widths.get_mut(col) {
                *width = (*width).max(cell.display().chars().count());
            }

            match cell {
                Cell::Text(text) => {
                    worksheet.write_string(row, col as u16, text)?;
                }
                Cell::Int(n) => {
                    worksheet.write_number(row, col as u16, n as f64)?;
                }
                Cell::Float(v) => {
                    worksheet.write_number(row, col as u16, v)?;
                }
                Cell::Empty => {}
            }
        }
    }

    for (col, width) in widths.iter().enumerate() {
        worksheet.set_column_width(col as u16, (*width + 2) as f64)?;
    }

    workbook.save(output_path)?;

    info!("Workbook written successfully ({} bytes)", file_size(output_path));
    Ok(())
}

/// Sheet names cannot contain `[]:*?/\` and are capped in length
fn sheet_title(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(MAX_SHEET_NAME)
        .collect();

    if cleaned.trim().is_empty() {
        "Sheet1".to_string()
    } else {
        cleaned
    }
}
