//! Server control port.
//!
//! This port covers everything the session bridge and the command surface
//! need from the process controller: configuration freshness, PID
//! discovery, startup, signal delivery and teardown.

use async_trait::async_trait;
use std::path::PathBuf;

use super::HarborError;
use crate::domain::{ServerProcess, Signal};

/// Process controller for one project's server.
///
/// # Design Rules
///
/// - At most one live server per environment; `start` refuses to launch a
///   second one
/// - A stale or unreadable PID record means "not running", never an error
/// - `send_signal` is fire-and-forget: `Ok(pid)` means the signal was sent,
///   not that the server acted on it
/// - `stop` only terminates the process it is handed, never whatever the
///   PID record names at the time
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServerControl: Send + Sync {
    /// Render the configuration for `environment` and persist it atomically.
    ///
    /// Returns the path of the written file.
    async fn ensure_config(&self, environment: &str) -> Result<PathBuf, HarborError>;

    /// PID of the live server for `environment`, if any.
    async fn current_pid(&self, environment: &str) -> Option<u32>;

    /// Describe the live server for `environment`, if any.
    async fn current_process(&self, environment: &str)
    -> Result<Option<ServerProcess>, HarborError>;

    /// Launch the server against the already-rendered configuration and
    /// wait (bounded) for its PID record to become valid.
    async fn start(&self, environment: &str) -> Result<ServerProcess, HarborError>;

    /// Deliver `signal` to the live server and return its PID.
    ///
    /// Returns `Err(HarborError::ProcessNotRunning)` if no server is live.
    async fn send_signal(&self, environment: &str, signal: &Signal) -> Result<u32, HarborError>;

    /// Terminate `target`, wait for it to exit and remove its PID record.
    ///
    /// Only `target.pid` is ever signalled. A record that names a different
    /// live process belongs to another server and is left in place. Returns
    /// `Err(HarborError::ProcessNotRunning)` if `target` is already gone.
    async fn stop(&self, target: &ServerProcess) -> Result<u32, HarborError>;
}
