//! Command handlers.
//!
//! Handlers follow one pattern:
//! - `pub async fn execute(ctx: &CliContext, ...) -> Result<()>` does the work
//! - a unit struct implements [`crate::Task`] and forwards to `execute`
//!
//! Handlers resolve the environment, call the ports on [`CliContext`], and
//! print through [`crate::presentation`]. They hold no server logic.
//!
//! [`CliContext`]: crate::CliContext

pub mod build;
pub mod exec;
pub mod migrate;
pub mod paths;
pub mod server;
pub mod signal;
