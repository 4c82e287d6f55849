//! Server process control.
//!
//! A server is tracked only through the PID record it writes. The
//! controller spawns the launcher, waits for that record, and afterwards
//! addresses the process by PID alone, so any later invocation can signal
//! or stop a server it did not start.

mod controller;
mod launch;
mod probe;
mod readiness;
pub mod shutdown;
mod signals;

pub use controller::{ProcessController, READINESS_POLL_INTERVAL, STOP_GRACE_PERIOD};
pub use launch::expand_launch_args;
#[cfg(test)]
pub use probe::MockProcessProbe;
pub use probe::{OsProcesses, ProcessProbe};
pub use readiness::{Readiness, wait_for_pid_record};
pub use signals::resolve_signal;
