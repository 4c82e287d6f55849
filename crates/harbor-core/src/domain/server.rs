//! The server process fronting one environment's configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// The operating system process, if any, currently serving an environment.
///
/// Created when the process controller starts a server or discovers a live
/// PID record. A `pid` of `None` means the process has been confirmed
/// stopped or the record was stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerProcess {
    /// Process ID of the server's master process.
    pub pid: Option<u32>,
    /// Environment name the configuration was rendered for.
    pub environment: String,
    /// Rendered configuration file the server was started against.
    pub config_path: PathBuf,
    /// Server executable.
    pub binary_path: PathBuf,
    /// Loopback port of the control endpoint.
    pub control_port: u16,
}

impl ServerProcess {
    /// Create a handle for a live process.
    pub fn running(
        pid: u32,
        environment: impl Into<String>,
        config_path: impl Into<PathBuf>,
        binary_path: impl Into<PathBuf>,
        control_port: u16,
    ) -> Self {
        Self {
            pid: Some(pid),
            environment: environment.into(),
            config_path: config_path.into(),
            binary_path: binary_path.into(),
            control_port,
        }
    }

    /// Base URL of the control endpoint.
    pub fn control_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.control_port)
    }
}

impl fmt::Display for ServerProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pid {
            Some(pid) => write!(f, "{} (pid {})", self.environment, pid),
            None => write!(f, "{} (stopped)", self.environment),
        }
    }
}
