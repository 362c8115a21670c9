//! Summary statistics over parsed memory data.
//!
//! These feed the text summaries printed by the CLI: which processes peak
//! highest, and how Mem/Swap usage moved over the log.

use super::normalizer::{Metric, NormalizedTable};
use crate::parser::schema::{MemoryKind, MemorySwapRecord};
use log::debug;

/// Per-process statistics for one metric
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySummary {
    pub entity: String,
    pub peak: f64,
    pub mean: f64,
    pub last: f64,
}

/// Summarize every process of a normalized table
///
/// **Public** - main entry point for process statistics
///
/// # Arguments
/// * `table` - Dense table (zero-filled cells count toward the mean)
/// * `metric` - Which column to summarize
///
/// # Returns
/// One summary per process, highest peak first (ties keep name order)
pub fn entity_summaries(table: &NormalizedTable, metric: Metric) -> Vec<EntitySummary> {
    let mut summaries: Vec<EntitySummary> = table
        .entities()
        .iter()
        .map(|entity| {
            let values: Vec<f64> = table.series(entity).iter().map(|r| metric.value(r)).collect();
            summarize_entity(entity, &values)
        })
        .collect();

    summaries.sort_by(|a, b| b.peak.total_cmp(&a.peak));

    debug!("Summarized {} processes by {}", summaries.len(), metric.label());
    summaries
}

fn summarize_entity(entity: &str, values: &[f64]) -> EntitySummary {
    let peak = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    };

    EntitySummary {
        entity: entity.to_string(),
        peak: if peak.is_finite() { peak } else { 0.0 },
        mean,
        last: values.last().copied().unwrap_or(0.0),
    }
}

/// Statistics of `used` for one `free` line kind
#[derive(Debug, Clone, PartialEq)]
pub struct MemorySummary {
    pub kind: MemoryKind,
    pub samples: usize,
    pub min_used: u64,
    pub max_used: u64,
    pub mean_used: f64,
    /// Last reported `available` (Mem only)
    pub last_available: Option<u64>,
}

/// Summarize `free` records per kind
///
/// Kinds without samples are omitted.
pub fn memory_summaries(records: &[MemorySwapRecord]) -> Vec<MemorySummary> {
    [MemoryKind::Mem, MemoryKind::Swap]
        .into_iter()
        .filter_map(|kind| {
            let of_kind: Vec<&MemorySwapRecord> =
                records.iter().filter(|r| r.kind == kind).collect();
            if of_kind.is_empty() {
                return None;
            }

            let used = of_kind.iter().map(|r| r.used);
            let total_used: u64 = used.clone().sum();

            Some(MemorySummary {
                kind,
                samples: of_kind.len(),
                min_used: used.clone().min().unwrap_or(0),
                max_used: used.max().unwrap_or(0),
                mean_used: total_used as f64 / of_kind.len() as f64,
                last_available: of_kind.last().and_then(|r| r.available),
            })
        })
        .collect()
}
