//! PID record I/O.

use std::fs;
use std::io;
use std::path::Path;

use crate::config::write_atomic;

/// Write a PID record atomically using temp file + rename.
pub fn write_pid_record(path: &Path, pid: u32) -> io::Result<()> {
    write_atomic(path, format!("{pid}\n").as_bytes())
}

/// Read the PID held by the record at `path`.
pub fn read_pid_record(path: &Path) -> io::Result<u32> {
    let content = fs::read_to_string(path)?;
    parse_pid_record(&content)
}

/// Delete a PID record (idempotent - no error if missing).
pub fn delete_pid_record(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Parse record content. Zero and anything non-numeric are invalid.
pub fn parse_pid_record(content: &str) -> io::Result<u32> {
    content
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|pid| *pid > 0)
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "missing or invalid PID"))
}
