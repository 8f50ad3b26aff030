// src/output/writer.rs
//! Delivers an assembled animation to a file or stdout.
//!
//! This module is the only place where file I/O operations occur.

use crate::error::AppError;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Output path meaning "write to stdout".
pub const STDOUT_TARGET: &str = "-";

/// Writes `bytes` to `path`, creating parent directories as needed.
///
/// Returns the number of bytes written.
pub fn write_animation(path: &Path, bytes: &[u8]) -> Result<usize, AppError> {
    if path.as_os_str() == STDOUT_TARGET {
        return print_to_stdout(bytes);
    }

    log::debug!("Writing {} bytes to {}", bytes.len(), path.display());

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, bytes)?;

    log::info!("Wrote animation: {}", path.display());
    Ok(bytes.len())
}

fn print_to_stdout(bytes: &[u8]) -> Result<usize, AppError> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(bytes)?;
    stdout.flush()?;
    Ok(bytes.len())
}
