//! Aggregate `pmap` output by protection mode and mapping.
//!
//! Input rows look like:
//!
//! ```text
//! Address           Kbytes     PSS   Dirty    Swap  Mode  Mapping
//! 0000555555554000     132     132       0       0  r-x-- app
//! 0000555555775000    1024     980     980       0  rw--- [ anon ]
//! ```

use crate::parser::schema::MappingRecord;
use crate::utils::config::{
    PMAP_HEADER_PREFIXES, PMAP_MIN_FIELDS, PMAP_SKIP_PREFIXES, UNKNOWN_MAPPING,
};
use log::debug;
use std::collections::HashMap;

/// Composite aggregation key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MappingKey {
    pub mode: String,
    pub mapping: String,
}

/// Running totals for one key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MappingTotals {
    pub size_kb: u64,
    pub pss_kb: u64,
    pub dirty_kb: u64,
}

impl MappingTotals {
    fn checked_add(self, other: MappingTotals) -> Option<MappingTotals> {
        Some(MappingTotals {
            size_kb: self.size_kb.checked_add(other.size_kb)?,
            pss_kb: self.pss_kb.checked_add(other.pss_kb)?,
            dirty_kb: self.dirty_kb.checked_add(other.dirty_kb)?,
        })
    }
}

/// Line-fed pmap aggregator
///
/// **Public** - feed lines in order, then call `finish`
#[derive(Debug, Default)]
pub struct MappingAggregator {
    parsing_data: bool,
    totals: HashMap<MappingKey, MappingTotals>,
    /// Keys in order of first appearance, for stable tie ordering
    order: Vec<MappingKey>,
    accepted: usize,
    skipped: usize,
}

impl MappingAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one raw line
    pub fn push_line(&mut self, line: &str) {
        let line = line.trim();

        if PMAP_HEADER_PREFIXES.iter().any(|p| line.starts_with(p)) {
            self.parsing_data = true;
            return;
        }

        if !self.parsing_data || PMAP_SKIP_PREFIXES.iter().any(|p| line.starts_with(p)) {
            return;
        }

        match parse_mapping_row(line) {
            Some((key, row)) => {
                if self.add(key, row) {
                    self.accepted += 1;
                } else {
                    debug!("pmap: row would overflow its totals, skipped: {}", line);
                    self.skipped += 1;
                }
            }
            None => {
                if !line.is_empty() {
                    self.skipped += 1;
                }
            }
        }
    }

    /// Add a row to its key; returns false and leaves totals untouched on overflow
    fn add(&mut self, key: MappingKey, row: MappingTotals) -> bool {
        let current = self.totals.get(&key).copied();
        let Some(sum) = current.unwrap_or_default().checked_add(row) else {
            return false;
        };

        if current.is_none() {
            self.order.push(key.clone());
        }
        self.totals.insert(key, sum);
        true
    }

    /// Totals for a key, if it was seen
    pub fn totals(&self, mode: &str, mapping: &str) -> Option<MappingTotals> {
        let key = MappingKey {
            mode: mode.to_string(),
            mapping: mapping.to_string(),
        };
        self.totals.get(&key).copied()
    }

    /// Aggregated rows, largest `size_kb` first
    ///
    /// Ties keep the order in which their keys first appeared.
    pub fn finish(mut self) -> Vec<MappingRecord> {
        debug!(
            "pmap: {} rows aggregated into {} keys, {} rows skipped",
            self.accepted,
            self.order.len(),
            self.skipped
        );

        let mut records: Vec<MappingRecord> = self
            .order
            .into_iter()
            .filter_map(|key| {
                let totals = self.totals.remove(&key)?;
                Some(MappingRecord {
                    protection_mode: key.mode,
                    mapping_label: key.mapping,
                    size_kb: totals.size_kb,
                    proportional_size_kb: totals.pss_kb,
                    dirty_kb: totals.dirty_kb,
                })
            })
            .collect();

        // sort_by is stable
        records.sort_by(|a, b| b.size_kb.cmp(&a.size_kb));
        records
    }
}

/// Aggregate a whole pmap report
///
/// **Public** - main entry point for pmap parsing
pub fn aggregate_pmap<'a, I>(lines: I) -> Vec<MappingRecord>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut aggregator = MappingAggregator::new();
    for line in lines {
        aggregator.push_line(line);
    }
    aggregator.finish()
}

/// Split a data row into its key and metrics
///
/// Fields: address, Kbytes, PSS, Dirty, Swap, Mode, Mapping tokens.
/// Address and Swap are not used.
fn parse_mapping_row(line: &str) -> Option<(MappingKey, MappingTotals)> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < PMAP_MIN_FIELDS {
        return None;
    }

    let row = MappingTotals {
        size_kb: parts[1].parse().ok()?,
        pss_kb: parts[2].parse().ok()?,
        dirty_kb: parts[3].parse().ok()?,
    };

    let key = MappingKey {
        mode: parts[5].to_string(),
        mapping: normalize_mapping_label(&parts[6..].join(" ")),
    };

    Some((key, row))
}

/// Strip pseudo-mapping brackets and substitute `Unknown` for empty labels
///
/// The inner text is trimmed too, so `[ anon ]` and `[anon]` share a key.
pub fn normalize_mapping_label(raw: &str) -> String {
    let raw = raw.trim();
    let label = if raw.starts_with('[') && raw.ends_with(']') {
        raw.trim_matches(|c| c == '[' || c == ']').trim()
    } else {
        raw
    };

    if label.is_empty() {
        UNKNOWN_MAPPING.to_string()
    } else {
        label.to_string()
    }
}
