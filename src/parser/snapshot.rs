//! Process-memory snapshot parser.
//!
//! Snapshot logs repeat a block like:
//!
//! ```text
//! 统计时间: 2024-05-01 10:00:00
//! PROCESS            PSS(MB)   RSS(MB)   VSS(MB)
//! system_server       120.50    180.00   2100.00
//! surfaceflinger       40.25     60.00    900.00
//! ---------------------------------------------
//! TOTAL               160.75    240.00   3000.00
//! ```
//!
//! The parser is an explicit state machine driven by classified lines.

use super::classifier::{ProcessFlavor, ProcessLine};
use super::schema::{Parsed, ProcessMemoryRecord};
use chrono::NaiveDateTime;
use log::debug;
use std::collections::HashMap;

/// Position of the parser within the snapshot structure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotState {
    /// Looking for the next timestamp marker
    Seeking,
    /// Have a timestamp, waiting for the table header
    AwaitingTable { timestamp: NaiveDateTime },
    /// Consuming data rows of the table
    InTable { timestamp: NaiveDateTime },
}

impl SnapshotState {
    /// Apply one classified line
    ///
    /// **Public** - transitions are testable on their own
    ///
    /// # Returns
    /// The next state and the record emitted by this line, if any
    pub fn transition(self, line: ProcessLine) -> (SnapshotState, Option<ProcessMemoryRecord>) {
        use SnapshotState::*;

        match (self, line) {
            // A marker always starts a new snapshot, even mid-table
            (_, ProcessLine::Timestamp(timestamp)) => (AwaitingTable { timestamp }, None),

            (AwaitingTable { timestamp }, ProcessLine::Header) => (InTable { timestamp }, None),

            (InTable { .. }, ProcessLine::Terminator) => (Seeking, None),

            (InTable { timestamp }, ProcessLine::Row(row)) => {
                let record = ProcessMemoryRecord {
                    timestamp,
                    entity_name: row.name,
                    pss: row.pss,
                    rss: row.rss,
                    vss: row.vss,
                };
                (InTable { timestamp }, Some(record))
            }

            (state, _) => (state, None),
        }
    }
}

/// Parse a process-memory log with the default flavor
///
/// **Public** - main entry point for snapshot logs
pub fn parse_process_memory(text: &str) -> Parsed<ProcessMemoryRecord> {
    parse_process_memory_with(text, &ProcessFlavor::default())
}

/// Parse a process-memory log
///
/// # Arguments
/// * `text` - Full report contents
/// * `flavor` - Patterns describing the report layout
///
/// # Returns
/// Records deduplicated by `(timestamp, entity)`, or `Parsed::NoData`
pub fn parse_process_memory_with(
    text: &str,
    flavor: &ProcessFlavor,
) -> Parsed<ProcessMemoryRecord> {
    let mut state = SnapshotState::Seeking;
    let mut records = Vec::new();
    let mut snapshots = 0usize;

    for line in text.lines() {
        let class = flavor.classify(line);
        if matches!(class, ProcessLine::Timestamp(_)) {
            snapshots += 1;
        }

        let (next, record) = state.transition(class);
        state = next;
        records.extend(record);
    }

    let raw_count = records.len();
    let records = dedup_last_wins(records);

    debug!(
        "Parsed {} process rows from {} snapshots ({} after dedup)",
        raw_count,
        snapshots,
        records.len()
    );

    records.into()
}

/// Keep only the last record for each `(timestamp, entity)` pair
///
/// The surviving record takes the position where its key first appeared.
pub fn dedup_last_wins(records: Vec<ProcessMemoryRecord>) -> Vec<ProcessMemoryRecord> {
    let mut slots: HashMap<(NaiveDateTime, String), usize> = HashMap::with_capacity(records.len());
    let mut unique: Vec<ProcessMemoryRecord> = Vec::with_capacity(records.len());

    for record in records {
        let key = (record.timestamp, record.entity_name.clone());
        match slots.get(&key) {
            Some(&slot) => unique[slot] = record,
            None => {
                slots.insert(key, unique.len());
                unique.push(record);
            }
        }
    }

    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::classifier::ProcessRow;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn row(name: &str, pss: f64) -> ProcessLine {
        ProcessLine::Row(ProcessRow {
            name: name.to_string(),
            pss,
            rss: pss * 2.0,
            vss: pss * 10.0,
        })
    }

    #[test]
    fn test_seeking_ignores_header_and_rows() {
        let (state, record) = SnapshotState::Seeking.transition(ProcessLine::Header);
        assert_eq!(state, SnapshotState::Seeking);
        assert!(record.is_none());

        let (state, record) = SnapshotState::Seeking.transition(row("app", 1.0));
        assert_eq!(state, SnapshotState::Seeking);
        assert!(record.is_none());
    }

    #[test]
    fn test_awaiting_table_needs_header_before_rows() {
        let t = ts("2024-05-01 10:00:00");
        let state = SnapshotState::AwaitingTable { timestamp: t };

        let (same, record) = state.transition(row("app", 1.0));
        assert_eq!(same, state);
        assert!(record.is_none());

        let (next, _) = state.transition(ProcessLine::Header);
        assert_eq!(next, SnapshotState::InTable { timestamp: t });
    }

    #[test]
    fn test_in_table_emits_and_terminates() {
        let t = ts("2024-05-01 10:00:00");
        let state = SnapshotState::InTable { timestamp: t };

        let (next, record) = state.transition(row("app", 1.0));
        assert_eq!(next, state);
        let record = record.unwrap();
        assert_eq!(record.entity_name, "app");
        assert_eq!(record.timestamp, t);

        let (next, _) = state.transition(ProcessLine::Terminator);
        assert_eq!(next, SnapshotState::Seeking);
    }

    #[test]
    fn test_timestamp_resets_mid_table() {
        let t1 = ts("2024-05-01 10:00:00");
        let t2 = ts("2024-05-01 10:01:00");
        let (next, _) =
            SnapshotState::InTable { timestamp: t1 }.transition(ProcessLine::Timestamp(t2));
        assert_eq!(next, SnapshotState::AwaitingTable { timestamp: t2 });
    }

    #[test]
    fn test_dedup_keeps_last_value_at_first_position() {
        let t = ts("2024-05-01 10:00:00");
        let record = |name: &str, v: f64| ProcessMemoryRecord {
            timestamp: t,
            entity_name: name.into(),
            pss: v,
            rss: v,
            vss: v,
        };
        let records = vec![record("a", 1.0), record("b", 2.0), record("a", 3.0)];

        let unique = dedup_last_wins(records);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].entity_name, "a");
        assert_eq!(unique[0].pss, 3.0);
        assert_eq!(unique[1].entity_name, "b");
    }

    #[test]
    fn test_parse_empty_input_is_no_data() {
        assert!(parse_process_memory("").is_no_data());
        assert!(parse_process_memory("just some text\nnothing here").is_no_data());
    }
}
