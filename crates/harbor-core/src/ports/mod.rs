//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No process, filesystem or HTTP types in any signature
//! - Intent-based methods for server control (not implementation-leaking)
//! - Every failure is a [`HarborError`]; adapters map their own errors into it

pub mod config_renderer;
pub mod migration_source;
pub mod migration_store;
pub mod server_control;
pub mod transport;

use std::path::PathBuf;
use thiserror::Error;

pub use config_renderer::{ConfigRenderer, RenderContext, RenderError};
pub use migration_source::MigrationSource;
pub use migration_store::{MigrationStore, RemoteFailure};
pub use server_control::ServerControl;
#[cfg(test)]
pub use server_control::MockServerControl;
pub use transport::{Connector, Transport};

use crate::settings::SettingsError;

/// Core error type for harbor operations.
///
/// None of these are retried automatically. Every variant is terminal for
/// the current invocation and bubbles unmodified to the command surface.
#[derive(Debug, Error)]
pub enum HarborError {
    /// No server executable was found in any searched location.
    #[error("server binary not found (searched: {})", join_paths(.searched))]
    BinaryNotFound { searched: Vec<PathBuf> },

    /// Rendering or persisting the configuration failed. The previous
    /// configuration file, if any, is left untouched.
    #[error("failed to write configuration {}: {reason}", .path.display())]
    ConfigWriteFailure { path: PathBuf, reason: String },

    /// The started server never produced a valid PID record.
    #[error("server for environment '{environment}' did not become ready within {waited_ms}ms")]
    StartupTimeout { environment: String, waited_ms: u64 },

    /// No live PID record exists for the environment.
    #[error("no running server for environment '{environment}'")]
    ProcessNotRunning { environment: String },

    /// A live server already fronts the environment.
    #[error("server for environment '{environment}' is already running (pid {pid})")]
    AlreadyRunning { environment: String, pid: u32 },

    /// The server executable could not be launched or exited during startup.
    #[error("failed to start server: {0}")]
    StartFailed(String),

    /// Stopping a server failed.
    #[error("failed to stop server: {0}")]
    StopFailed(String),

    /// A custom signal name or number is not known to the OS.
    #[error("invalid signal: {0}")]
    InvalidSignal(String),

    /// Code raised inside the server process.
    #[error("{detail}")]
    ExecutionFailure { detail: String },

    /// A migration step raised inside the server process. Steps that ran
    /// before it remain recorded as applied.
    #[error("migration {step_name} failed: {detail}")]
    MigrationStepFailure { step_name: String, detail: String },

    /// The control endpoint was unreachable or answered with garbage.
    #[error("control endpoint error: {reason}")]
    Transport { reason: String },

    /// Project settings are invalid.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// Filesystem error outside the configuration write path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl HarborError {
    /// Construct a transport error from anything displayable.
    pub fn transport(reason: impl std::fmt::Display) -> Self {
        Self::Transport {
            reason: reason.to_string(),
        }
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "nothing".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
