//! Server command handler.

use anyhow::Result;
use async_trait::async_trait;

use crate::bootstrap::CliContext;
use crate::commands::Invocation;
use crate::presentation;
use crate::registry::Task;

/// Render the configuration and start the server for the environment.
///
/// Fails with `AlreadyRunning` when a live server already fronts the
/// environment; the existing server is left alone.
pub async fn execute(ctx: &CliContext, environment: Option<&str>) -> Result<()> {
    let environment = ctx.environment(environment)?;

    ctx.control.ensure_config(environment).await?;
    let process = ctx.control.start(environment).await?;

    println!("{}", presentation::server_started(&process));
    Ok(())
}

pub struct ServerTask;

#[async_trait]
impl Task for ServerTask {
    fn name(&self) -> &'static str {
        "server"
    }

    fn usage(&self) -> &'static str {
        "server [env]"
    }

    fn summary(&self) -> &'static str {
        "Render the configuration and start the server"
    }

    async fn run(&self, ctx: &CliContext, invocation: &Invocation) -> Result<()> {
        execute(ctx, invocation.environment.as_deref()).await
    }
}
