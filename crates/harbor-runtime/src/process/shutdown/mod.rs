//! Graceful server shutdown.
//!
//! Provides two shutdown strategies:
//! - `shutdown_child`: for servers this invocation spawned (includes reaping)
//! - `terminate_pid`: for servers known only by their PID record

mod child;
mod pid;

pub use child::shutdown_child;
pub use pid::terminate_pid;
