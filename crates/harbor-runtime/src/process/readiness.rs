//! Waiting for a started server to publish its PID record.

use std::path::Path;
use std::process::ExitStatus;
use std::time::Duration;

use tokio::process::Child;
use tokio::time::{Instant, sleep};
use tracing::debug;

use super::ProcessProbe;
use crate::pidfile::read_pid_record;

/// Outcome of waiting for a server to come up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// The record names a live process.
    Ready(u32),
    /// The launcher failed before the record appeared.
    Exited(ExitStatus),
    /// No valid record within the timeout.
    TimedOut,
}

/// Poll `pid_path` every `poll` until it names a live process.
///
/// A launcher that exits successfully is assumed to have daemonized and
/// polling continues; a failing launcher ends the wait early. A `timeout`
/// too large to be represented as a deadline never expires.
pub async fn wait_for_pid_record(
    pid_path: &Path,
    probe: &dyn ProcessProbe,
    launcher: &mut Child,
    timeout: Duration,
    poll: Duration,
) -> Readiness {
    let deadline = Instant::now().checked_add(timeout);
    let mut launcher_done = false;

    loop {
        if let Ok(pid) = read_pid_record(pid_path) {
            if probe.is_alive(pid) {
                return Readiness::Ready(pid);
            }
            debug!(pid, "PID record names a dead process, still waiting");
        }

        if !launcher_done {
            if let Ok(Some(status)) = launcher.try_wait() {
                if !status.success() {
                    return Readiness::Exited(status);
                }
                debug!("Launcher exited cleanly, waiting for daemon");
                launcher_done = true;
            }
        }

        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Readiness::TimedOut;
        }
        sleep(poll).await;
    }
}
