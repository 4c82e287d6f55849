//! Signal command handlers: `hup`, `term` and `signal`.
//!
//! Signals are fire-and-forget. Success means the OS accepted delivery,
//! not that the server acted on it.

use anyhow::Result;
use async_trait::async_trait;

use harbor_core::Signal;

use crate::bootstrap::CliContext;
use crate::commands::Invocation;
use crate::error::CliError;
use crate::presentation;
use crate::registry::Task;

/// Send `signal` to the environment's running server.
pub async fn execute(ctx: &CliContext, signal: &Signal, environment: Option<&str>) -> Result<()> {
    let environment = ctx.environment(environment)?;
    let pid = ctx.control.send_signal(environment, signal).await?;
    println!("{}", presentation::signal_sent(signal, pid));
    Ok(())
}

/// Reload the configuration (SIGHUP).
pub struct HupTask;

#[async_trait]
impl Task for HupTask {
    fn name(&self) -> &'static str {
        "hup"
    }

    fn usage(&self) -> &'static str {
        "hup [env]"
    }

    fn summary(&self) -> &'static str {
        "Ask the running server to reload its configuration"
    }

    async fn run(&self, ctx: &CliContext, invocation: &Invocation) -> Result<()> {
        execute(ctx, &Signal::Reload, invocation.environment.as_deref()).await
    }
}

/// Graceful shutdown (SIGTERM).
pub struct TermTask;

#[async_trait]
impl Task for TermTask {
    fn name(&self) -> &'static str {
        "term"
    }

    fn usage(&self) -> &'static str {
        "term [env]"
    }

    fn summary(&self) -> &'static str {
        "Ask the running server to shut down"
    }

    async fn run(&self, ctx: &CliContext, invocation: &Invocation) -> Result<()> {
        execute(ctx, &Signal::Terminate, invocation.environment.as_deref()).await
    }
}

/// Any signal by name or number.
pub struct SignalTask;

#[async_trait]
impl Task for SignalTask {
    fn name(&self) -> &'static str {
        "signal"
    }

    fn usage(&self) -> &'static str {
        "signal <name> [env]"
    }

    fn summary(&self) -> &'static str {
        "Send any signal to the running server"
    }

    async fn run(&self, ctx: &CliContext, invocation: &Invocation) -> Result<()> {
        let Some(name) = invocation.argument.as_deref() else {
            return Err(CliError::Arguments("signal requires a signal name".into()).into());
        };
        let signal = Signal::Custom(name.to_string());
        execute(ctx, &signal, invocation.environment.as_deref()).await
    }
}
