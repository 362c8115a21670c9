//! `free` log parser.
//!
//! Each `Mem:` or `Swap:` line becomes one record. Marker lines set the
//! timestamp of the records that follow. Logs without markers get synthetic
//! timestamps one second apart, counted from the moment parsing began.

use super::classifier::{FreeFlavor, FreeLine};
use super::schema::{MemoryKind, MemorySwapRecord, Parsed};
use chrono::{Duration, Local, NaiveDateTime};
use log::debug;
use std::collections::HashSet;

/// Parser state for one `free` log
///
/// **Public** - use `FreeParser::starting_at` to pin synthetic timestamps
#[derive(Debug, Clone)]
pub struct FreeParser {
    start: NaiveDateTime,
    current: Option<NaiveDateTime>,
    explicit: bool,
    synthetic_blocks: i64,
    records: Vec<MemorySwapRecord>,
}

impl FreeParser {
    /// Parser whose synthetic timestamps count from now
    pub fn new() -> Self {
        Self::starting_at(Local::now().naive_local())
    }

    /// Parser whose synthetic timestamps count from `start`
    pub fn starting_at(start: NaiveDateTime) -> Self {
        Self {
            start,
            current: None,
            explicit: false,
            synthetic_blocks: 0,
            records: Vec::new(),
        }
    }

    /// Feed one classified line
    pub fn push(&mut self, line: FreeLine) {
        match line {
            FreeLine::Timestamp(timestamp) => {
                self.current = Some(timestamp);
                self.explicit = true;
            }
            FreeLine::Mem([total, used, free, shared, buffers_cache, available]) => {
                let extra = Some([shared, buffers_cache, available]);
                self.emit(MemoryKind::Mem, [total, used, free], extra);
            }
            FreeLine::Swap([total, used, free]) => {
                self.emit(MemoryKind::Swap, [total, used, free], None);
            }
            FreeLine::Noise => {}
        }
    }

    fn emit(&mut self, kind: MemoryKind, [total, used, free]: [u64; 3], extra: Option<[u64; 3]>) {
        let timestamp = match self.current {
            Some(timestamp) => timestamp,
            None => {
                self.synthetic_blocks += 1;
                let synthetic = self.start + Duration::seconds(self.synthetic_blocks);
                self.current = Some(synthetic);
                synthetic
            }
        };

        self.records.push(MemorySwapRecord {
            timestamp,
            index: 0,
            kind,
            total,
            used,
            free,
            shared: extra.map(|e| e[0]),
            buffers_cache: extra.map(|e| e[1]),
            available: extra.map(|e| e[2]),
        });

        // Without markers every line gets its own synthetic timestamp, even
        // a Swap line that directly follows its Mem line.
        if !self.explicit {
            self.current = None;
        }
    }

    /// Assign sequential indexes and return the records
    pub fn finish(self) -> Parsed<MemorySwapRecord> {
        let mut records = self.records;
        for (index, record) in records.iter_mut().enumerate() {
            record.index = index;
        }

        debug!(
            "Parsed {} free records ({} synthetic timestamps)",
            records.len(),
            self.synthetic_blocks
        );

        records.into()
    }
}

impl Default for FreeParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a `free` log with the default flavor
///
/// **Public** - main entry point for free logs
pub fn parse_free(text: &str) -> Parsed<MemorySwapRecord> {
    parse_free_with(text, &FreeFlavor::default(), FreeParser::new())
}

/// Parse a `free` log with an explicit flavor and parser
pub fn parse_free_with(
    text: &str,
    flavor: &FreeFlavor,
    mut parser: FreeParser,
) -> Parsed<MemorySwapRecord> {
    for line in text.lines() {
        parser.push(flavor.classify(line));
    }
    parser.finish()
}

/// X axis a consumer should plot free records against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XAxis {
    Timestamp,
    Index,
}

impl XAxis {
    /// Fewer than two distinct timestamps carry no useful variation,
    /// so fall back to the record index.
    pub fn choose(records: &[MemorySwapRecord]) -> XAxis {
        Self::from_timestamps(records.iter())
    }

    /// Axis for the records of one kind only
    ///
    /// Mem and Swap are plotted separately, so each gets its own choice.
    pub fn choose_for(records: &[MemorySwapRecord], kind: MemoryKind) -> XAxis {
        Self::from_timestamps(records.iter().filter(|r| r.kind == kind))
    }

    fn from_timestamps<'a>(records: impl Iterator<Item = &'a MemorySwapRecord>) -> XAxis {
        let distinct: HashSet<NaiveDateTime> = records.map(|r| r.timestamp).collect();
        if distinct.len() < 2 {
            XAxis::Index
        } else {
            XAxis::Timestamp
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn parse_at(text: &str, start: NaiveDateTime) -> Vec<MemorySwapRecord> {
        let parser = FreeParser::starting_at(start);
        parse_free_with(text, &FreeFlavor::default(), parser).into_records()
    }

    #[test]
    fn test_degraded_mode_splits_mem_and_swap() {
        let start = ts("2024-05-01 00:00:00");
        let records = parse_at("Mem: 8 4 1 0 3 3\nSwap: 2 0 2\n", start);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].timestamp, start + Duration::seconds(1));
        assert_eq!(records[1].timestamp, start + Duration::seconds(2));
        assert_eq!(records[1].kind, MemoryKind::Swap);
        assert_eq!(records[1].shared, None);
    }

    #[test]
    fn test_explicit_marker_scopes_following_lines() {
        let start = ts("2024-05-01 00:00:00");
        let text = "统计时间: 2024-05-02 08:00:00\nMem: 8 4 1 0 3 3\nSwap: 2 0 2\n";
        let records = parse_at(text, start);

        assert!(records.iter().all(|r| r.timestamp == ts("2024-05-02 08:00:00")));
        assert_eq!(records[0].available, Some(3));
        assert_eq!(XAxis::choose(&records), XAxis::Index);
    }

    #[test]
    fn test_lines_before_first_marker_are_synthetic() {
        let start = ts("2024-05-01 00:00:00");
        let text = "Mem: 8 4 1 0 3 3\n统计时间: 2024-05-02 08:00:00\nMem: 8 5 1 0 2 2\n";
        let records = parse_at(text, start);

        assert_eq!(records[0].timestamp, start + Duration::seconds(1));
        assert_eq!(records[1].timestamp, ts("2024-05-02 08:00:00"));
        assert_eq!(XAxis::choose(&records), XAxis::Timestamp);
    }

    #[test]
    fn test_axis_chosen_per_kind() {
        let start = ts("2024-05-01 00:00:00");
        let text = "Mem: 8 4 1 0 3 3\n统计时间: 2024-05-02 08:00:00\nSwap: 2 0 2\n";
        let records = parse_at(text, start);

        assert_eq!(XAxis::choose(&records), XAxis::Timestamp);
        assert_eq!(XAxis::choose_for(&records, MemoryKind::Mem), XAxis::Index);
        assert_eq!(XAxis::choose_for(&records, MemoryKind::Swap), XAxis::Index);
    }

    #[test]
    fn test_empty_log_is_no_data() {
        assert!(parse_free("total used free\n").is_no_data());
    }
}
