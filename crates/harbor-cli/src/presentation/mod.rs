//! Shared CLI presentation utilities.
//!
//! Keep this module format-only: handlers decide what happened, these
//! functions decide how it reads on the terminal.

use std::path::Path;

use harbor_core::{MigrationReport, ServerProcess, Signal};

pub fn server_started(process: &ServerProcess) -> String {
    match process.pid {
        Some(pid) => format!("server started (pid {pid})"),
        None => "server started".to_string(),
    }
}

pub fn config_written(path: &Path) -> String {
    format!("configuration written to {}", path.display())
}

pub fn server_reloaded(pid: u32) -> String {
    format!("server reloaded (pid {pid})")
}

pub fn signal_sent(signal: &Signal, pid: u32) -> String {
    format!("sent {signal} to pid {pid}")
}

pub fn migration_summary(report: &MigrationReport) -> String {
    if report.is_noop() {
        return format!(
            "no pending migrations ({} already applied)",
            report.skipped
        );
    }
    let keys: Vec<String> = report.applied.iter().map(ToString::to_string).collect();
    format!(
        "applied {} migration{}: {}",
        keys.len(),
        if keys.len() == 1 { "" } else { "s" },
        keys.join(", ")
    )
}

/// Output of remote code, always ending in exactly one newline unless empty.
pub fn exec_output(output: &str) -> String {
    if output.is_empty() {
        String::new()
    } else {
        format!("{}\n", output.trim_end_matches('\n'))
    }
}
