//! Domain types shared by every harbor component.
//!
//! These are plain data types with no infrastructure dependencies.

mod execution;
mod migration;
mod server;
mod session;
mod signal;

pub use execution::{ExecutionRequest, ExecutionResult, MigrationReport};
pub use migration::{MigrationKey, MigrationStep, sort_steps};
pub use server::ServerProcess;
pub use session::SessionMode;
pub use signal::{Signal, SignalSpec};
