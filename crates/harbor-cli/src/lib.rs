//! The `harbor` command-line tool.
//!
//! Parses arguments with clap, wires the runtime adapters together in
//! [`bootstrap`], and dispatches each invocation through the
//! [`CommandRegistry`].
#![deny(unused_crate_dependencies)]

// Silence unused dev-dependency warnings for crates only integration tests use
#[cfg(test)]
use serde_json as _;
#[cfg(test)]
use tempfile as _;

// Used by main.rs only
use dotenvy as _;
use tokio as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;
pub mod registry;

#[cfg(test)]
mod testing;

// Re-export primary types for convenient access
pub use bootstrap::{CliConfig, CliContext, bootstrap, init_logging};
pub use commands::{Commands, Invocation};
pub use error::CliError;
pub use parser::{Cli, GlobalFlags};
pub use registry::{CommandRegistry, Task};
