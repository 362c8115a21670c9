//! Report parsing and record definitions.
//!
//! This module handles:
//! - Classifying report lines per log flavor
//! - Parsing process-memory snapshots
//! - Parsing `free` Mem/Swap logs
//! - Defining the typed records

pub mod classifier;
pub mod free;
pub mod schema;
pub mod snapshot;

// Re-export main types
pub use classifier::{FreeFlavor, FreeLine, ProcessFlavor, ProcessLine, ProcessRow};
pub use free::{parse_free, parse_free_with, FreeParser, XAxis};
pub use schema::{MappingRecord, MemoryKind, MemorySwapRecord, Parsed, ProcessMemoryRecord};
pub use snapshot::{dedup_last_wins, parse_process_memory, parse_process_memory_with, SnapshotState};
