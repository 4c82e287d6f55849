//! Core domain types and port definitions for harbor.
//!
//! harbor controls a long-running application server process: it renders the
//! server configuration for an environment, starts the process, delivers
//! control signals to it and runs code or migrations inside it through a
//! local control endpoint.
//!
//! This crate holds no OS or network code. Process control, configuration
//! rendering and the control-endpoint transport are expressed as ports
//! (traits) and implemented in `harbor-runtime`.
#![deny(unused_crate_dependencies)]

pub mod contracts;
pub mod domain;
pub mod environment;
pub mod paths;
pub mod ports;
pub mod services;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    ExecutionRequest, ExecutionResult, MigrationKey, MigrationReport, MigrationStep,
    ServerProcess, SessionMode, Signal, SignalSpec,
};
pub use environment::{DEFAULT_ENVIRONMENT, EnvironmentResolver};
pub use paths::ProjectLayout;
pub use ports::{
    ConfigRenderer, Connector, HarborError, MigrationSource, MigrationStore, RemoteFailure,
    RenderContext, RenderError, ServerControl, Transport,
};
pub use services::{SessionBridge, apply_batch};
pub use settings::{EnvironmentSettings, ProjectSettings, SettingsError, validate_settings};

// Silence unused dev-dependency warnings for crates only some tests use
#[cfg(test)]
use mockall as _;
#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tokio as _;
