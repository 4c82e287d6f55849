//! Build command handler.

use anyhow::Result;
use async_trait::async_trait;

use harbor_core::Signal;

use crate::bootstrap::CliContext;
use crate::commands::Invocation;
use crate::presentation;
use crate::registry::Task;

/// Render the configuration; reload the server if one is running.
///
/// With no server running this only writes the file, so a later `server`
/// picks it up.
pub async fn execute(ctx: &CliContext, environment: Option<&str>) -> Result<()> {
    let environment = ctx.environment(environment)?;

    let path = ctx.control.ensure_config(environment).await?;
    println!("{}", presentation::config_written(&path));

    if ctx.control.current_pid(environment).await.is_some() {
        let pid = ctx.control.send_signal(environment, &Signal::Reload).await?;
        println!("{}", presentation::server_reloaded(pid));
    }
    Ok(())
}

pub struct BuildTask;

#[async_trait]
impl Task for BuildTask {
    fn name(&self) -> &'static str {
        "build"
    }

    fn usage(&self) -> &'static str {
        "build [env]"
    }

    fn summary(&self) -> &'static str {
        "Render the configuration and reload a running server"
    }

    async fn run(&self, ctx: &CliContext, invocation: &Invocation) -> Result<()> {
        execute(ctx, invocation.environment.as_deref()).await
    }
}
