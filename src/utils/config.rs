//! Configuration and constants for the parsers and the CLI.

/// Current export report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Label that precedes the timestamp on snapshot marker lines.
/// The capture scripts write `统计时间: 2024-05-01 10:00:00`.
pub const DEFAULT_TIME_LABEL: &str = "统计时间";

/// Calendar format of marker timestamps
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Header row that opens a per-process table
pub const PROCESS_HEADER_PATTERN: &str = r"PROCESS\s+PSS\(MB\)\s+RSS\(MB\)\s+VSS\(MB\)";

/// Per-process data row: name followed by exactly three decimal values
pub const PROCESS_ROW_PATTERN: &str =
    r"^(\S+)\s+(-?\d+\.\d+)\s+(-?\d+\.\d+)\s+(-?\d+\.\d+)$";

/// Table terminators inside a process snapshot
pub const TERMINATOR_PREFIX: &str = "---";
pub const TERMINATOR_TOKEN: &str = "TOTAL";

// `free` rows carry a fixed number of integer columns
pub const MEM_ROW_PATTERN: &str = r"^Mem:\s+(\d+)\s+(\d+)\s+(\d+)\s+(\d+)\s+(\d+)\s+(\d+)$";
pub const SWAP_ROW_PATTERN: &str = r"^Swap:\s+(\d+)\s+(\d+)\s+(\d+)$";

// pmap layout
pub const PMAP_HEADER_PREFIXES: &[&str] = &["Address", "------"];
pub const PMAP_SKIP_PREFIXES: &[&str] = &["total", "---"];
pub const PMAP_MIN_FIELDS: usize = 6;
pub const UNKNOWN_MAPPING: &str = "Unknown";

/// Minimum column widths of the pmap text table (Mode, Mapping, Kbytes, PSS, Dirty)
pub const PMAP_MIN_WIDTHS: [usize; 5] = [7, 8, 5, 3, 5];

/// Spreadsheet extensions accepted without rewriting the output path
pub const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm"];
