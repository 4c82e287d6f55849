//! Terminate a server by PID without reaping (no Child handle available).

use std::io;
use std::time::Duration;

use tokio::time::{Instant, sleep};

use crate::process::ProcessProbe;

const SIGTERM: i32 = 15;
const SIGKILL: i32 = 9;

/// Terminate `pid` with SIGTERM → SIGKILL escalation.
///
/// # Strategy
/// 1. Send SIGTERM
/// 2. Poll every `poll` for up to `grace` until the process is gone
/// 3. If still alive, send SIGKILL and poll again for up to `grace`
///
/// # Returns
/// - `Ok(())` if the process exited or was already gone
/// - `Err(TimedOut)` if it survived SIGKILL
pub async fn terminate_pid(
    probe: &dyn ProcessProbe,
    pid: u32,
    grace: Duration,
    poll: Duration,
) -> io::Result<()> {
    for signal in [SIGTERM, SIGKILL] {
        match probe.deliver(pid, signal) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e),
        }

        if wait_for_exit(probe, pid, grace, poll).await {
            return Ok(());
        }
        tracing::debug!(pid, signal, "Process still alive after signal");
    }

    Err(io::Error::new(
        io::ErrorKind::TimedOut,
        format!("process {pid} survived SIGKILL"),
    ))
}

async fn wait_for_exit(
    probe: &dyn ProcessProbe,
    pid: u32,
    grace: Duration,
    poll: Duration,
) -> bool {
    let deadline = Instant::now() + grace;
    loop {
        if !probe.is_alive(pid) {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        sleep(poll).await;
    }
}
