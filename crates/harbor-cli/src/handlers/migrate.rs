//! Migrate command handler.
//!
//! Steps come from the project's migrations directory. The server applies
//! the pending ones in order and stops at the first failure; re-running
//! resumes after the last applied step.

use anyhow::{Result, bail};
use async_trait::async_trait;

use harbor_core::{ExecutionRequest, ExecutionResult};

use crate::bootstrap::CliContext;
use crate::commands::Invocation;
use crate::presentation;
use crate::registry::Task;

/// Apply pending migrations inside the environment's server.
pub async fn execute(ctx: &CliContext, environment: Option<&str>) -> Result<()> {
    let environment = ctx.environment(environment)?;

    let steps = ctx.migrations.load()?;
    if steps.is_empty() {
        println!(
            "no migrations found in {}",
            ctx.layout.migrations_dir().display()
        );
        return Ok(());
    }

    tracing::debug!(environment, count = steps.len(), "Sending migration batch");
    let request = ExecutionRequest::migrate(steps, ctx.trace);
    match ctx.bridge.with_session(environment, &request).await? {
        ExecutionResult::Migrated(report) => {
            println!("{}", presentation::migration_summary(&report));
            Ok(())
        }
        ExecutionResult::Output(_) => {
            bail!("control endpoint answered a migration batch with plain output")
        }
    }
}

pub struct MigrateTask;

#[async_trait]
impl Task for MigrateTask {
    fn name(&self) -> &'static str {
        "migrate"
    }

    fn usage(&self) -> &'static str {
        "migrate [env]"
    }

    fn summary(&self) -> &'static str {
        "Apply pending migrations inside the server"
    }

    async fn run(&self, ctx: &CliContext, invocation: &Invocation) -> Result<()> {
        execute(ctx, invocation.environment.as_deref()).await
    }
}
