//! Exec command handler.

use anyhow::{Result, bail};
use async_trait::async_trait;

use harbor_core::{ExecutionRequest, ExecutionResult};

use crate::bootstrap::CliContext;
use crate::commands::Invocation;
use crate::error::CliError;
use crate::presentation;
use crate::registry::Task;

/// Run `code` inside the environment's server and print its output.
///
/// Attaches to a running server, or starts one for the duration of the
/// call and stops it afterwards.
pub async fn execute(ctx: &CliContext, code: &str, environment: Option<&str>) -> Result<()> {
    let environment = ctx.environment(environment)?;

    let request = ExecutionRequest::code(code, ctx.trace);
    match ctx.bridge.with_session(environment, &request).await? {
        ExecutionResult::Output(output) => {
            print!("{}", presentation::exec_output(&output));
            Ok(())
        }
        ExecutionResult::Migrated(_) => {
            bail!("control endpoint answered an exec request with a migration report")
        }
    }
}

pub struct ExecTask;

#[async_trait]
impl Task for ExecTask {
    fn name(&self) -> &'static str {
        "exec"
    }

    fn usage(&self) -> &'static str {
        "exec <code> [env]"
    }

    fn summary(&self) -> &'static str {
        "Run code inside the server and print its output"
    }

    async fn run(&self, ctx: &CliContext, invocation: &Invocation) -> Result<()> {
        let Some(code) = invocation.argument.as_deref() else {
            return Err(CliError::Arguments("exec requires code to run".into()).into());
        };
        execute(ctx, code, invocation.environment.as_deref()).await
    }
}
