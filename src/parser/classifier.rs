//! Line classification for the supported log flavors.
//!
//! A flavor bundles the patterns of one report layout. Classification is
//! pure: it trims the line, matches it, and parses every captured field.
//! A line that looks right but fails to parse is `Noise`, never an error.

use crate::utils::config::{
    DEFAULT_TIME_LABEL, MEM_ROW_PATTERN, PROCESS_HEADER_PATTERN, PROCESS_ROW_PATTERN,
    SWAP_ROW_PATTERN, TERMINATOR_PREFIX, TERMINATOR_TOKEN, TIMESTAMP_FORMAT,
};
use crate::utils::error::ConfigError;
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;

static DEFAULT_PROCESS_FLAVOR: Lazy<ProcessFlavor> = Lazy::new(|| {
    ProcessFlavor::with_time_label(DEFAULT_TIME_LABEL)
        .expect("failed to compile process flavor patterns")
});

static DEFAULT_FREE_FLAVOR: Lazy<FreeFlavor> = Lazy::new(|| {
    FreeFlavor::with_time_label(DEFAULT_TIME_LABEL).expect("failed to compile free flavor patterns")
});

/// One parsed row of a per-process table
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessRow {
    pub name: String,
    pub pss: f64,
    pub rss: f64,
    pub vss: f64,
}

/// Classification of a process-memory log line
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessLine {
    Timestamp(NaiveDateTime),
    Header,
    Terminator,
    Row(ProcessRow),
    Noise,
}

/// Classification of a `free` log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FreeLine {
    Timestamp(NaiveDateTime),
    /// total, used, free, shared, buff/cache, available
    Mem([u64; 6]),
    /// total, used, free
    Swap([u64; 3]),
    Noise,
}

/// Patterns for process-memory snapshot logs
#[derive(Debug, Clone)]
pub struct ProcessFlavor {
    timestamp: Regex,
    header: Regex,
    row: Regex,
}

impl ProcessFlavor {
    /// Build a flavor whose marker lines start with `label:`
    pub fn with_time_label(label: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            timestamp: marker_pattern(label)?,
            header: Regex::new(PROCESS_HEADER_PATTERN)?,
            row: Regex::new(PROCESS_ROW_PATTERN)?,
        })
    }

    /// Classify one line
    ///
    /// Priority: timestamp, header, terminator, data row. A `TOTAL` row that
    /// happens to look like data is therefore always a terminator.
    pub fn classify(&self, line: &str) -> ProcessLine {
        let line = line.trim();

        if let Some(timestamp) = parse_marker(&self.timestamp, line) {
            return ProcessLine::Timestamp(timestamp);
        }

        if self.header.is_match(line) {
            return ProcessLine::Header;
        }

        if line.starts_with(TERMINATOR_PREFIX) || line.contains(TERMINATOR_TOKEN) {
            return ProcessLine::Terminator;
        }

        self.parse_row(line)
            .map(ProcessLine::Row)
            .unwrap_or(ProcessLine::Noise)
    }

    fn parse_row(&self, line: &str) -> Option<ProcessRow> {
        let caps = self.row.captures(line)?;

        Some(ProcessRow {
            name: caps[1].to_string(),
            pss: parse_finite(&caps[2])?,
            rss: parse_finite(&caps[3])?,
            vss: parse_finite(&caps[4])?,
        })
    }
}

impl Default for ProcessFlavor {
    fn default() -> Self {
        DEFAULT_PROCESS_FLAVOR.clone()
    }
}

/// Patterns for `free` logs
#[derive(Debug, Clone)]
pub struct FreeFlavor {
    timestamp: Regex,
    mem: Regex,
    swap: Regex,
}

impl FreeFlavor {
    pub fn with_time_label(label: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            timestamp: marker_pattern(label)?,
            mem: Regex::new(MEM_ROW_PATTERN)?,
            swap: Regex::new(SWAP_ROW_PATTERN)?,
        })
    }

    pub fn classify(&self, line: &str) -> FreeLine {
        let line = line.trim();

        if let Some(timestamp) = parse_marker(&self.timestamp, line) {
            return FreeLine::Timestamp(timestamp);
        }

        if let Some(values) = capture_integers::<6>(&self.mem, line) {
            return FreeLine::Mem(values);
        }

        if let Some(values) = capture_integers::<3>(&self.swap, line) {
            return FreeLine::Swap(values);
        }

        FreeLine::Noise
    }
}

impl Default for FreeFlavor {
    fn default() -> Self {
        DEFAULT_FREE_FLAVOR.clone()
    }
}

/// Compile the marker pattern for a timestamp label
fn marker_pattern(label: &str) -> Result<Regex, ConfigError> {
    let label = label.trim();
    if label.is_empty() {
        return Err(ConfigError::EmptyLabel);
    }

    let pattern = format!(
        r"^{}:\s*(\d{{4}}-\d{{2}}-\d{{2}} \d{{2}}:\d{{2}}:\d{{2}})",
        regex::escape(label)
    );
    Ok(Regex::new(&pattern)?)
}

/// Extract a marker timestamp; impossible dates yield `None`
fn parse_marker(pattern: &Regex, line: &str) -> Option<NaiveDateTime> {
    let caps = pattern.captures(line)?;
    NaiveDateTime::parse_from_str(&caps[1], TIMESTAMP_FORMAT).ok()
}

fn parse_finite(field: &str) -> Option<f64> {
    field.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse all `N` capture groups as integers, failing the whole line on any miss
fn capture_integers<const N: usize>(pattern: &Regex, line: &str) -> Option<[u64; N]> {
    let caps = pattern.captures(line)?;
    let mut values = [0u64; N];

    for (slot, group) in values.iter_mut().zip(caps.iter().skip(1)) {
        *slot = group?.as_str().parse().ok()?;
    }

    Some(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).unwrap()
    }

    #[test]
    fn test_classify_timestamp() {
        let flavor = ProcessFlavor::default();
        assert_eq!(
            flavor.classify("  统计时间: 2024-05-01 10:00:00  "),
            ProcessLine::Timestamp(ts("2024-05-01 10:00:00"))
        );
    }

    #[test]
    fn test_impossible_date_is_noise() {
        let flavor = ProcessFlavor::default();
        assert_eq!(flavor.classify("统计时间: 2024-13-45 10:00:00"), ProcessLine::Noise);
    }

    #[test]
    fn test_classify_header_and_terminators() {
        let flavor = ProcessFlavor::default();
        assert_eq!(
            flavor.classify("PROCESS   PSS(MB)  RSS(MB)  VSS(MB)"),
            ProcessLine::Header
        );
        assert_eq!(flavor.classify("-----------------"), ProcessLine::Terminator);
        assert_eq!(flavor.classify("TOTAL 10.0 20.0 30.0"), ProcessLine::Terminator);
    }

    #[test]
    fn test_classify_row_allows_negative_values() {
        let flavor = ProcessFlavor::default();
        assert_eq!(
            flavor.classify("surfaceflinger  -1.50 20.25 300.00"),
            ProcessLine::Row(ProcessRow {
                name: "surfaceflinger".to_string(),
                pss: -1.5,
                rss: 20.25,
                vss: 300.0,
            })
        );
    }

    #[test]
    fn test_row_field_count_must_be_exact() {
        let flavor = ProcessFlavor::default();
        assert_eq!(flavor.classify("app 1.0 2.0"), ProcessLine::Noise);
        assert_eq!(flavor.classify("app 1.0 2.0 3.0 4.0"), ProcessLine::Noise);
        assert_eq!(flavor.classify("app 1 2 3"), ProcessLine::Noise);
    }

    #[test]
    fn test_custom_label() {
        let flavor = ProcessFlavor::with_time_label("Time").unwrap();
        assert_eq!(
            flavor.classify("Time: 2024-05-01 10:00:00"),
            ProcessLine::Timestamp(ts("2024-05-01 10:00:00"))
        );
        assert!(ProcessFlavor::with_time_label("  ").is_err());
    }

    #[test]
    fn test_classify_free_lines() {
        let flavor = FreeFlavor::default();
        assert_eq!(
            flavor.classify("Mem:  8000 4000 1000 200 2800 3500"),
            FreeLine::Mem([8000, 4000, 1000, 200, 2800, 3500])
        );
        assert_eq!(flavor.classify("Swap: 2048 0 2048"), FreeLine::Swap([2048, 0, 2048]));
        assert_eq!(flavor.classify("Mem: 8000 4000"), FreeLine::Noise);
        assert_eq!(flavor.classify("Swap: 2048 -1 2048"), FreeLine::Noise);
        assert_eq!(
            flavor.classify("              total        used        free"),
            FreeLine::Noise
        );
    }

    #[test]
    fn test_free_integer_overflow_is_noise() {
        let flavor = FreeFlavor::default();
        assert_eq!(
            flavor.classify("Swap: 99999999999999999999999 0 1"),
            FreeLine::Noise
        );
    }
}
