use crate::aggregator::Metric;
use crate::utils::config::DEFAULT_TIME_LABEL;
use std::path::PathBuf;

/// Arguments for the process command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ProcessArgs {
    /// Snapshot log to parse
    pub input: PathBuf,

    /// Export path for the normalized table (optional)
    pub output: Option<PathBuf>,

    /// Metric used for the summary ranking
    pub metric: Metric,

    /// Restrict summary and export to these processes (empty = all)
    pub entities: Vec<String>,

    /// Label preceding marker timestamps
    pub time_label: String,

    /// Number of processes shown in the summary
    pub top: usize,
}

impl Default for ProcessArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from("memory.log"),
            output: None,
            metric: Metric::Pss,
            entities: Vec::new(),
            time_label: DEFAULT_TIME_LABEL.to_string(),
            top: 20,
        }
    }
}

/// Arguments for the free command
#[derive(Debug, Clone)]
pub struct FreeArgs {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub time_label: String,
}

impl Default for FreeArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from("free.log"),
            output: None,
            time_label: DEFAULT_TIME_LABEL.to_string(),
        }
    }
}

/// Arguments for the pmap command
#[derive(Debug, Clone, Default)]
pub struct PmapArgs {
    /// pmap output file; standard input when absent
    pub input: Option<PathBuf>,

    /// Spreadsheet path (optional)
    pub output: Option<PathBuf>,
}

/// How a command finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Records were produced
    Completed { records: usize },
    /// Input held nothing parsable
    NoData,
}
