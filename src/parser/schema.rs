//! Typed records produced by the parsers.
//!
//! Every record is a plain value: parsers build them, the normalizer and the
//! aggregator read them and produce new values.

use crate::utils::config::TIMESTAMP_FORMAT;
use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Timestamps serialize as `YYYY-MM-DD HH:MM:SS`, the layout of the marker lines
mod timestamp_format {
    use super::*;

    pub fn serialize<S: Serializer>(timestamp: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&timestamp.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// One process row of a memory snapshot (values in MB)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessMemoryRecord {
    /// Snapshot timestamp the row belongs to
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,

    /// Process name as printed in the first column
    pub entity_name: String,

    /// Proportional set size
    pub pss: f64,

    /// Resident set size
    pub rss: f64,

    /// Virtual set size
    pub vss: f64,
}

impl ProcessMemoryRecord {
    /// Zero-valued placeholder for a process missing from a snapshot
    pub fn zeroed(timestamp: NaiveDateTime, entity_name: impl Into<String>) -> Self {
        Self {
            timestamp,
            entity_name: entity_name.into(),
            pss: 0.0,
            rss: 0.0,
            vss: 0.0,
        }
    }
}

/// Which `free` line a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MemoryKind {
    Mem,
    Swap,
}

impl fmt::Display for MemoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryKind::Mem => write!(f, "Mem"),
            MemoryKind::Swap => write!(f, "Swap"),
        }
    }
}

/// One `Mem:` or `Swap:` line of a `free` log (values in KB)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorySwapRecord {
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,

    /// Zero-based position among all emitted records
    pub index: usize,

    pub kind: MemoryKind,
    pub total: u64,
    pub used: u64,
    pub free: u64,

    /// Only reported on `Mem:` lines
    pub shared: Option<u64>,
    pub buffers_cache: Option<u64>,
    pub available: Option<u64>,
}

/// Aggregated pmap usage for one `(mode, mapping)` pair (values in KB)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRecord {
    pub protection_mode: String,
    pub mapping_label: String,
    pub size_kb: u64,
    pub proportional_size_kb: u64,
    pub dirty_kb: u64,
}

/// Result of a whole-input parse
///
/// An input that yields no records is reported as `NoData` rather than as an
/// error; callers decide how to tell the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed<T> {
    Records(Vec<T>),
    NoData,
}

impl<T> Parsed<T> {
    pub fn is_no_data(&self) -> bool {
        matches!(self, Parsed::NoData)
    }

    pub fn len(&self) -> usize {
        match self {
            Parsed::Records(records) => records.len(),
            Parsed::NoData => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records, or an empty vector for `NoData`
    pub fn into_records(self) -> Vec<T> {
        match self {
            Parsed::Records(records) => records,
            Parsed::NoData => Vec::new(),
        }
    }

    pub fn records(&self) -> &[T] {
        match self {
            Parsed::Records(records) => records,
            Parsed::NoData => &[],
        }
    }
}

impl<T> From<Vec<T>> for Parsed<T> {
    fn from(records: Vec<T>) -> Self {
        if records.is_empty() {
            Parsed::NoData
        } else {
            Parsed::Records(records)
        }
    }
}
