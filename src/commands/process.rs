//! Process command implementation.
//!
//! The process command:
//! 1. Reads the snapshot log
//! 2. Parses per-process tables
//! 3. Normalizes snapshots into a dense table
//! 4. Prints a summary and writes the export (if requested)

use super::models::{CommandOutcome, ProcessArgs};
use super::utils::read_input;
use crate::aggregator::{entity_summaries, normalize, EntitySummary, Metric, NormalizedTable};
use crate::output::{export_records, Align, Cell, TextTable};
use crate::parser::{parse_process_memory_with, ProcessFlavor};
use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use std::time::Instant;

/// Execute the process command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Missing input file
/// * Invalid timestamp label
///
/// Export failures are logged and do not fail the command.
pub fn execute_process(args: ProcessArgs) -> Result<CommandOutcome> {
    let start_time = Instant::now();

    info!("Step 1/4: Reading {}...", args.input.display());
    let text = read_input(Some(args.input.as_path()))?;

    let flavor = ProcessFlavor::with_time_label(&args.time_label)
        .context("Failed to build snapshot patterns")?;

    info!("Step 2/4: Parsing snapshots...");
    let parsed = parse_process_memory_with(&text, &flavor);
    if parsed.is_no_data() {
        warn!("No process records found in {}", args.input.display());
        return Ok(CommandOutcome::NoData);
    }

    info!("Step 3/4: Normalizing {} records...", parsed.len());
    let mut table = normalize(parsed.records());

    if !args.entities.is_empty() {
        for name in &args.entities {
            if !table.entities().contains(name) {
                warn!("Process '{}' does not appear in the log", name);
            }
        }
        table = table.filter_entities(&args.entities[..]);
    }

    debug!(
        "Table: {} snapshots x {} processes",
        table.timestamps().len(),
        table.entities().len()
    );

    let summaries = entity_summaries(&table, args.metric);
    for line in render_process_summary(&table, &summaries, args.metric, args.top) {
        println!("{}", line);
    }

    if let Some(path) = &args.output {
        info!("Step 4/4: Exporting normalized table...");
        match export_records(table.rows(), path, "Process Memory") {
            Ok(format) => info!("✓ {:?} export written to: {}", format, path.display()),
            Err(e) => error!("Export to {} failed: {}", path.display(), e),
        }
    } else {
        info!("Step 4/4: Skipping export (no output path)");
    }

    info!("Completed in {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(CommandOutcome::Completed { records: table.len() })
}

/// Build the console summary
///
/// **Public** - separated from printing for testing
pub fn render_process_summary(
    table: &NormalizedTable,
    summaries: &[EntitySummary],
    metric: Metric,
    top: usize,
) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Snapshots: {}  Processes: {}  Rows: {}",
            table.timestamps().len(),
            table.entities().len(),
            table.len()
        ),
    ];

    if let (Some(first), Some(last)) = (table.timestamps().first(), table.timestamps().last()) {
        lines.push(format!("Range: {} .. {}", first, last));
    }

    lines.push(String::new());
    lines.push(format!("Top processes by {}:", metric.label()));

    let mut text = TextTable::new(&[
        ("Process", Align::Left),
        ("Peak", Align::Right),
        ("Mean", Align::Right),
        ("Last", Align::Right),
    ]);
    for summary in summaries.iter().take(top) {
        text.push_row(&[
            Cell::Text(summary.entity.clone()),
            Cell::Float(summary.peak),
            Cell::Float(summary.mean),
            Cell::Float(summary.last),
        ]);
    }
    lines.extend(text.render());

    lines
}

/// Validate process arguments
///
/// **Public** - can be called before execute_process for early validation
pub fn validate_args(args: &ProcessArgs) -> Result<()> {
    if args.top == 0 {
        anyhow::bail!("top must be greater than 0");
    }

    if args.time_label.trim().is_empty() {
        anyhow::bail!("Timestamp label cannot be empty");
    }

    Ok(())
}
