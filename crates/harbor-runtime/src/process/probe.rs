//! Liveness probing and signal delivery.

use std::io;

/// The OS surface the process controller needs.
#[cfg_attr(test, mockall::automock)]
pub trait ProcessProbe: Send + Sync {
    /// Whether a process with `pid` exists.
    ///
    /// A process we may not signal still counts as alive.
    fn is_alive(&self, pid: u32) -> bool;

    /// Deliver raw signal number `signal` to `pid`.
    ///
    /// A vanished process is reported as [`io::ErrorKind::NotFound`].
    fn deliver(&self, pid: u32, signal: i32) -> io::Result<()>;
}

/// [`ProcessProbe`] backed by `kill(2)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsProcesses;

#[cfg(unix)]
impl ProcessProbe for OsProcesses {
    fn is_alive(&self, pid: u32) -> bool {
        use nix::errno::Errno;
        use nix::sys::signal;

        let Some(pid) = nix_pid(pid) else {
            return false;
        };

        // Signal None is the null signal: existence check only
        match signal::kill(pid, None) {
            Ok(()) => true,
            Err(Errno::ESRCH) => false,
            Err(_) => true,
        }
    }

    fn deliver(&self, pid: u32, signal: i32) -> io::Result<()> {
        use nix::errno::Errno;
        use nix::sys::signal::{self, Signal};

        let target = nix_pid(pid)
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "PID out of range"))?;
        let signal = Signal::try_from(signal).map_err(io::Error::from)?;

        signal::kill(target, signal).map_err(|e| match e {
            Errno::ESRCH => io::Error::new(io::ErrorKind::NotFound, format!("no process {pid}")),
            other => io::Error::from(other),
        })
    }
}

/// PIDs 0 and above `i32::MAX` would address process groups, never a
/// single process.
#[cfg(unix)]
fn nix_pid(pid: u32) -> Option<nix::unistd::Pid> {
    i32::try_from(pid)
        .ok()
        .filter(|p| *p > 0)
        .map(nix::unistd::Pid::from_raw)
}

#[cfg(not(unix))]
impl ProcessProbe for OsProcesses {
    fn is_alive(&self, _pid: u32) -> bool {
        false
    }

    fn deliver(&self, _pid: u32, _signal: i32) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "signals are not supported on this platform",
        ))
    }
}
