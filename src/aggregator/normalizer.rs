//! Reconcile irregular snapshots into a dense timestamp × process grid.
//!
//! Processes come and go between snapshots. Charting per-process series needs
//! one value per process at every timestamp, so absent cells are zero-filled.

use crate::parser::schema::ProcessMemoryRecord;
use crate::parser::snapshot::dedup_last_wins;
use chrono::NaiveDateTime;
use log::debug;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Which per-process metric a consumer is looking at
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Metric {
    Pss,
    Rss,
    Vss,
}

impl Metric {
    pub fn value(self, record: &ProcessMemoryRecord) -> f64 {
        match self {
            Metric::Pss => record.pss,
            Metric::Rss => record.rss,
            Metric::Vss => record.vss,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::Pss => "PSS(MB)",
            Metric::Rss => "RSS(MB)",
            Metric::Vss => "VSS(MB)",
        }
    }
}

/// Complete cross-product of timestamps and processes
///
/// Rows are laid out timestamp-major: ascending timestamps, and within each
/// timestamp, process names in sorted order.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable {
    timestamps: Vec<NaiveDateTime>,
    entities: Vec<String>,
    rows: Vec<ProcessMemoryRecord>,
}

impl NormalizedTable {
    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    pub fn rows(&self) -> &[ProcessMemoryRecord] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<ProcessMemoryRecord> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell for one `(timestamp, entity)` pair
    pub fn get(&self, timestamp: NaiveDateTime, entity: &str) -> Option<&ProcessMemoryRecord> {
        let t = self.timestamps.binary_search(&timestamp).ok()?;
        let e = self.entities.binary_search_by(|name| name.as_str().cmp(entity)).ok()?;
        self.rows.get(t * self.entities.len() + e)
    }

    /// Time series of one process, ascending by timestamp
    pub fn series(&self, entity: &str) -> Vec<&ProcessMemoryRecord> {
        self.timestamps
            .iter()
            .filter_map(|t| self.get(*t, entity))
            .collect()
    }

    /// Table restricted to the named processes
    ///
    /// Unknown names are ignored. The result is still complete over the
    /// remaining processes.
    pub fn filter_entities<S: AsRef<str>>(&self, keep: &[S]) -> NormalizedTable {
        let keep: HashSet<&str> = keep.iter().map(|s| s.as_ref()).collect();
        let entities: Vec<String> = self
            .entities
            .iter()
            .filter(|e| keep.contains(e.as_str()))
            .cloned()
            .collect();
        let rows = self
            .rows
            .iter()
            .filter(|r| keep.contains(r.entity_name.as_str()))
            .cloned()
            .collect();

        NormalizedTable {
            timestamps: self.timestamps.clone(),
            entities,
            rows,
        }
    }
}

/// Build the dense table from raw records
///
/// **Public** - main entry point for normalization
///
/// # Algorithm
/// 1. Deduplicate by `(timestamp, entity)`, last record wins
/// 2. Collect distinct timestamps and entities
/// 3. Walk the cross-product, taking the source record or a zero-filled one
pub fn normalize(records: &[ProcessMemoryRecord]) -> NormalizedTable {
    let unique = dedup_last_wins(records.to_vec());

    let timestamps: BTreeSet<NaiveDateTime> = unique.iter().map(|r| r.timestamp).collect();
    let entities: BTreeSet<&str> = unique.iter().map(|r| r.entity_name.as_str()).collect();

    let cells: HashMap<(NaiveDateTime, &str), &ProcessMemoryRecord> = unique
        .iter()
        .map(|r| ((r.timestamp, r.entity_name.as_str()), r))
        .collect();

    let mut rows = Vec::with_capacity(timestamps.len() * entities.len());
    for &timestamp in &timestamps {
        for &entity in &entities {
            let row = match cells.get(&(timestamp, entity)) {
                Some(record) => (*record).clone(),
                None => ProcessMemoryRecord::zeroed(timestamp, entity),
            };
            rows.push(row);
        }
    }

    debug!(
        "Normalized {} records into {} timestamps x {} processes ({} filled)",
        records.len(),
        timestamps.len(),
        entities.len(),
        rows.len() - cells.len()
    );

    NormalizedTable {
        timestamps: timestamps.into_iter().collect(),
        entities: entities.into_iter().map(str::to_string).collect(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn record(t: &str, name: &str, pss: f64) -> ProcessMemoryRecord {
        ProcessMemoryRecord {
            timestamp: ts(t),
            entity_name: name.to_string(),
            pss,
            rss: pss + 1.0,
            vss: pss + 2.0,
        }
    }

    #[test]
    fn test_normalize_fills_missing_cells() {
        let records = vec![
            record("2024-05-01 10:00:00", "a", 1.0),
            record("2024-05-01 10:00:00", "b", 2.0),
            record("2024-05-01 10:01:00", "a", 3.0),
        ];

        let table = normalize(&records);

        assert_eq!(table.len(), 4);
        let missing = table.get(ts("2024-05-01 10:01:00"), "b").unwrap();
        assert_eq!((missing.pss, missing.rss, missing.vss), (0.0, 0.0, 0.0));
        assert_eq!(table.get(ts("2024-05-01 10:00:00"), "b").unwrap(), &records[1]);
    }

    #[test]
    fn test_normalize_applies_last_write_wins() {
        let records = vec![
            record("2024-05-01 10:00:00", "a", 1.0),
            record("2024-05-01 10:00:00", "a", 9.0),
        ];

        let table = normalize(&records);
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].pss, 9.0);
    }

    #[test]
    fn test_series_and_filter() {
        let records = vec![
            record("2024-05-01 10:01:00", "b", 2.0),
            record("2024-05-01 10:00:00", "a", 1.0),
        ];

        let table = normalize(&records);
        let series: Vec<f64> = table.series("a").iter().map(|r| Metric::Pss.value(r)).collect();
        assert_eq!(series, vec![1.0, 0.0]);

        let only_b = table.filter_entities(&["b"]);
        assert_eq!(only_b.entities(), &["b".to_string()]);
        assert_eq!(only_b.len(), 2);
        assert!(table.series("missing").is_empty());
    }

    #[test]
    fn test_normalize_empty() {
        let table = normalize(&[]);
        assert!(table.is_empty());
        assert!(table.timestamps().is_empty());
    }
}
