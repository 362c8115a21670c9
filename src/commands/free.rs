//! Free command implementation.
//!
//! Parses a `free` log, prints Mem/Swap statistics and exports the records.

use super::models::{CommandOutcome, FreeArgs};
use super::utils::read_input;
use crate::aggregator::{memory_summaries, MemorySummary};
use crate::output::{export_records, Align, Cell, TextTable};
use crate::parser::{parse_free_with, FreeFlavor, FreeParser, MemorySwapRecord, XAxis};
use anyhow::{Context, Result};
use log::{error, info, warn};

/// Execute the free command
///
/// **Public** - main entry point called from main.rs
pub fn execute_free(args: FreeArgs) -> Result<CommandOutcome> {
    info!("Step 1/3: Reading {}...", args.input.display());
    let text = read_input(Some(args.input.as_path()))?;

    let flavor =
        FreeFlavor::with_time_label(&args.time_label).context("Failed to build free patterns")?;

    info!("Step 2/3: Parsing Mem/Swap lines...");
    let parsed = parse_free_with(&text, &flavor, FreeParser::new());
    if parsed.is_no_data() {
        warn!("No Mem/Swap records found in {}", args.input.display());
        return Ok(CommandOutcome::NoData);
    }

    let records = parsed.into_records();
    let summaries = memory_summaries(&records);
    for line in render_free_summary(&records, &summaries) {
        println!("{}", line);
    }

    if let Some(path) = &args.output {
        info!("Step 3/3: Exporting records...");
        match export_records(&records, path, "Free Memory") {
            Ok(format) => info!("✓ {:?} export written to: {}", format, path.display()),
            Err(e) => error!("Export to {} failed: {}", path.display(), e),
        }
    } else {
        info!("Step 3/3: Skipping export (no output path)");
    }

    Ok(CommandOutcome::Completed {
        records: records.len(),
    })
}

/// Build the console summary
///
/// Each kind gets its own X axis line, in summary order.
pub fn render_free_summary(
    records: &[MemorySwapRecord],
    summaries: &[MemorySummary],
) -> Vec<String> {
    let mut lines = vec![format!("Records: {}", records.len())];
    for summary in summaries {
        let axis = match XAxis::choose_for(records, summary.kind) {
            XAxis::Timestamp => "timestamp",
            XAxis::Index => "index (fewer than 2 distinct timestamps)",
        };
        lines.push(format!("X axis ({}): {}", summary.kind, axis));
    }
    lines.push(String::new());

    let mut table = TextTable::new(&[
        ("Kind", Align::Left),
        ("Samples", Align::Right),
        ("Min used", Align::Right),
        ("Max used", Align::Right),
        ("Mean used", Align::Right),
        ("Available", Align::Right),
    ]);
    for summary in summaries {
        table.push_row(&[
            Cell::Text(summary.kind.to_string()),
            Cell::Int(summary.samples as u64),
            Cell::Int(summary.min_used),
            Cell::Int(summary.max_used),
            Cell::Float(summary.mean_used),
            summary.last_available.map(Cell::Int).unwrap_or(Cell::Empty),
        ]);
    }
    lines.extend(table.render());

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn start() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2024-05-01 00:00:00", "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_render_free_summary_uses_index_axis() {
        let start = start();
        let text = "统计时间: 2024-05-01 09:00:00\nMem: 100 40 60 0 0 55\nSwap: 10 1 9\n";
        let parser = FreeParser::starting_at(start);
        let records = parse_free_with(text, &FreeFlavor::default(), parser).into_records();

        let lines = render_free_summary(&records, &memory_summaries(&records));

        assert_eq!(lines[0], "Records: 2");
        assert!(lines[1].starts_with("X axis (Mem): index"));
        assert!(lines[2].starts_with("X axis (Swap): index"));
        assert!(lines[6].starts_with("Mem "));
        assert!(lines[6].trim_end().ends_with("55"));
        assert!(lines[7].starts_with("Swap"));
    }

    #[test]
    fn test_render_free_summary_axis_per_kind() {
        let start = start();
        let text = "Mem: 100 40 60 0 0 55\n\
                    Mem: 100 41 59 0 0 54\n\
                    统计时间: 2024-05-01 09:00:00\n\
                    Swap: 10 1 9\n";
        let parser = FreeParser::starting_at(start);
        let records = parse_free_with(text, &FreeFlavor::default(), parser).into_records();

        let lines = render_free_summary(&records, &memory_summaries(&records));

        assert_eq!(lines[1], "X axis (Mem): timestamp");
        assert!(lines[2].starts_with("X axis (Swap): index"));
    }
}
