//! Pmap command implementation.
//!
//! Reads pmap output from a file or standard input, aggregates it by
//! `(mode, mapping)`, optionally writes a workbook, and prints the table.

use super::models::{CommandOutcome, PmapArgs};
use super::utils::read_input;
use crate::aggregator::aggregate_pmap;
use crate::output::{ensure_spreadsheet_extension, write_xlsx, Align, Cell, TextTable};
use crate::parser::MappingRecord;
use crate::utils::config::PMAP_MIN_WIDTHS;
use anyhow::Result;
use log::{error, info, warn};

/// Execute the pmap command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// Only a missing, explicitly named input file is an error. Workbook
/// failures are reported and the table is still printed.
pub fn execute_pmap(args: PmapArgs) -> Result<CommandOutcome> {
    let text = read_input(args.input.as_deref())?;

    let records = aggregate_pmap(text.lines());
    info!("Aggregated {} mapping groups", records.len());

    if let Some(requested) = &args.output {
        let (path, rewritten) = ensure_spreadsheet_extension(requested);
        if rewritten {
            warn!(
                "Spreadsheet output should end in .xlsx or .xlsm, writing to {}",
                path.display()
            );
        }

        match write_xlsx(&records, &path, "Mapping Summary") {
            Ok(()) => info!("✓ Workbook written to: {}", path.display()),
            Err(e) => error!("Failed to write workbook {}: {}", path.display(), e),
        }
    }

    println!();
    println!("Memory usage by mapping:");
    for line in format_mapping_table(&records) {
        println!("{}", line);
    }

    if records.is_empty() {
        Ok(CommandOutcome::NoData)
    } else {
        Ok(CommandOutcome::Completed {
            records: records.len(),
        })
    }
}

/// Column-aligned mapping table, rows in the given order
pub fn format_mapping_table(records: &[MappingRecord]) -> Vec<String> {
    let mut table = TextTable::new(&[
        ("Mode", Align::Left),
        ("Mapping", Align::Left),
        ("Kbytes", Align::Right),
        ("PSS", Align::Right),
        ("Dirty", Align::Right),
    ])
    .with_min_widths(&PMAP_MIN_WIDTHS);

    for record in records {
        table.push_row(&[
            Cell::Text(record.protection_mode.clone()),
            Cell::Text(record.mapping_label.clone()),
            Cell::Int(record.size_kb),
            Cell::Int(record.proportional_size_kb),
            Cell::Int(record.dirty_kb),
        ]);
    }

    table.render()
}
