//! Aggregation of parsed records into tables and statistics.
//!
//! This module transforms parsed records into:
//! - A dense timestamp × process table (for per-process time series)
//! - Per-mapping pmap totals
//! - Summary statistics for the CLI

pub mod mapping;
pub mod metrics;
pub mod normalizer;

// Re-export main types and functions
pub use mapping::{
    aggregate_pmap, normalize_mapping_label, MappingAggregator, MappingKey, MappingTotals,
};
pub use metrics::{entity_summaries, memory_summaries, EntitySummary, MemorySummary};
pub use normalizer::{normalize, Metric, NormalizedTable};
