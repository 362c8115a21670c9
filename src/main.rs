//! Memlog Studio CLI
//!
//! Turns process-memory, free and pmap reports into summaries and exports.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use memlog_studio::aggregator::Metric;
use memlog_studio::commands::{
    display_version, execute_free, execute_pmap, execute_process, validate_args, FreeArgs,
    PmapArgs, ProcessArgs,
};
use memlog_studio::utils::config::DEFAULT_TIME_LABEL;

/// Memlog Studio - memory report analysis
#[derive(Parser, Debug)]
#[command(name = "memlog")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a per-process memory snapshot log
    Process {
        /// Snapshot log file
        #[arg(short, long)]
        input: PathBuf,

        /// Export normalized table (.csv, .json, .xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Metric used to rank processes
        #[arg(long, value_enum, default_value_t = Metric::Pss)]
        metric: Metric,

        /// Only include these processes (repeatable)
        #[arg(short, long = "entity")]
        entities: Vec<String>,

        /// Label preceding snapshot timestamps
        #[arg(long, env = "MEMLOG_TIME_LABEL", default_value = DEFAULT_TIME_LABEL)]
        time_label: String,

        /// Number of processes to show
        #[arg(long, default_value = "20")]
        top: usize,
    },

    /// Analyze a log of `free` output
    Free {
        /// free log file
        #[arg(short, long)]
        input: PathBuf,

        /// Export records (.csv, .json, .xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Label preceding snapshot timestamps
        #[arg(long, env = "MEMLOG_TIME_LABEL", default_value = DEFAULT_TIME_LABEL)]
        time_label: String,
    },

    /// Summarize pmap output by mode and mapping
    Pmap {
        /// pmap input file (reads standard input when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Excel output file (e.g. result.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Process {
            input,
            output,
            metric,
            entities,
            time_label,
            top,
        } => {
            let args = ProcessArgs {
                input,
                output,
                metric,
                entities,
                time_label,
                top,
            };

            validate_args(&args)?;
            execute_process(args)?;
        }

        Commands::Free {
            input,
            output,
            time_label,
        } => {
            execute_free(FreeArgs {
                input,
                output,
                time_label,
            })?;
        }

        Commands::Pmap { input, output } => {
            execute_pmap(PmapArgs { input, output })?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
