//! Paths command handler.
//!
//! Prints every resolved path for one environment in `key = value` form.
//! Nothing is created or touched.

use anyhow::Result;
use async_trait::async_trait;

use crate::bootstrap::CliContext;
use crate::commands::Invocation;
use crate::registry::Task;

pub fn execute(ctx: &CliContext, environment: Option<&str>) -> Result<()> {
    let environment = ctx.environment(environment)?;
    println!("{}", ctx.layout.describe(environment));
    Ok(())
}

pub struct PathsTask;

#[async_trait]
impl Task for PathsTask {
    fn name(&self) -> &'static str {
        "paths"
    }

    fn usage(&self) -> &'static str {
        "paths [env]"
    }

    fn summary(&self) -> &'static str {
        "Show resolved project paths"
    }

    async fn run(&self, ctx: &CliContext, invocation: &Invocation) -> Result<()> {
        execute(ctx, invocation.environment.as_deref())
    }
}
