//! OS and network adapters for harbor.
//!
//! Implements the ports declared in `harbor-core`:
//!
//! - [`ProcessController`] controls server processes through PID records
//!   and signals ([`harbor_core::ServerControl`])
//! - [`PlaceholderRenderer`] renders configuration templates
//!   ([`harbor_core::ConfigRenderer`])
//! - [`HttpConnector`] talks to the server's control endpoint
//!   ([`harbor_core::Connector`])
//! - [`FsMigrationSource`] loads migration steps from disk
//!   ([`harbor_core::MigrationSource`])
#![deny(unused_crate_dependencies)]

pub mod binary;
pub mod bridge;
pub mod config;
mod logged;
mod migrations;
pub mod pidfile;
pub mod process;

pub use binary::{BINARY_ENV_VAR, BinaryLocator};
pub use bridge::{HttpConnector, HttpTransport};
pub use config::{ConfigCoordinator, PlaceholderRenderer};
pub use logged::LoggedControl;
pub use migrations::FsMigrationSource;
pub use process::{OsProcesses, ProcessController, ProcessProbe};

#[cfg(test)]
use mockall as _;
#[cfg(test)]
use tempfile as _;
