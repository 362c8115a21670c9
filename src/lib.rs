//! Memlog Studio
//!
//! Parsers for periodic memory-usage reports:
//! - process-memory snapshot logs (per-process PSS/RSS/VSS tables)
//! - `free` logs (Mem/Swap lines)
//! - `pmap` output (per-mapping sizes)
//!
//! Parsed records are normalized into dense time-series tables or
//! aggregated per mapping, then exported as CSV, JSON or XLSX.
//!
//! ## Getting Started
//!
//! ```bash
//! memlog process -i memory.log -o memory.xlsx
//! memlog free -i free.log
//! pmap -x 1234 | memlog pmap
//! ```
//!
//! The core parsing functions take in-memory text and never perform I/O.

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod utils;
