//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod free;
pub mod models;
pub mod pmap;
pub mod process;
pub mod utils;

// Re-export main command functions
pub use free::execute_free;
pub use models::{CommandOutcome, FreeArgs, PmapArgs, ProcessArgs};
pub use pmap::execute_pmap;
pub use process::{execute_process, validate_args};
pub use utils::{display_version, read_input};
