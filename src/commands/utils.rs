use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::InputError;
use std::io::{self, IsTerminal, Read};
use std::path::Path;

/// Read a whole report into memory
///
/// Reads `path` when given, otherwise standard input until end of stream.
/// Invalid UTF-8 sequences are replaced rather than rejected.
///
/// # Errors
/// * `InputError::NotFound` - The named file does not exist
/// * `InputError::ReadFailed` - Any other I/O error
pub fn read_input(path: Option<&Path>) -> Result<String, InputError> {
    let bytes = match path {
        Some(path) => std::fs::read(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                InputError::NotFound(path.to_path_buf())
            } else {
                InputError::ReadFailed(e)
            }
        })?,
        None => {
            let stdin = io::stdin();
            if stdin.is_terminal() {
                eprintln!("Paste pmap output, then press Ctrl+D:");
            }
            let mut buffer = Vec::new();
            stdin.lock().read_to_end(&mut buffer)?;
            buffer
        }
    };

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Display version information
pub fn display_version() {
    println!("Memlog Studio v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Parse process-memory, free and pmap reports into tables.");
}
