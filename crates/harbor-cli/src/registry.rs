//! Command registry.
//!
//! Built once per invocation and never mutated afterwards. Dispatch looks
//! the invocation's name up here; the same table renders the command
//! listing shown for unknown commands.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use anyhow::Result;
use async_trait::async_trait;

use crate::bootstrap::CliContext;
use crate::commands::Invocation;
use crate::error::CliError;
use crate::handlers;

/// One command the CLI can run.
#[async_trait]
pub trait Task: Send + Sync {
    /// Name the command is invoked by.
    fn name(&self) -> &'static str;

    /// Argument synopsis, e.g. `exec <code> [env]`.
    fn usage(&self) -> &'static str;

    /// One-line description.
    fn summary(&self) -> &'static str;

    async fn run(&self, ctx: &CliContext, invocation: &Invocation) -> Result<()>;
}

/// Immutable name → task table.
pub struct CommandRegistry {
    tasks: BTreeMap<&'static str, Box<dyn Task>>,
}

impl CommandRegistry {
    /// Registry from an explicit task list. Later duplicates replace
    /// earlier ones.
    pub fn new(tasks: Vec<Box<dyn Task>>) -> Self {
        Self {
            tasks: tasks.into_iter().map(|task| (task.name(), task)).collect(),
        }
    }

    /// Every built-in command.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(handlers::server::ServerTask),
            Box::new(handlers::build::BuildTask),
            Box::new(handlers::signal::HupTask),
            Box::new(handlers::signal::TermTask),
            Box::new(handlers::signal::SignalTask),
            Box::new(handlers::exec::ExecTask),
            Box::new(handlers::migrate::MigrateTask),
            Box::new(handlers::paths::PathsTask),
        ])
    }

    pub fn get(&self, name: &str) -> Option<&dyn Task> {
        self.tasks.get(name).map(|task| &**task)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tasks.keys().copied()
    }

    /// Human-readable command listing.
    pub fn listing(&self) -> String {
        let width = self.tasks.values().map(|t| t.usage().len()).max().unwrap_or(0);
        let mut out = String::from("Commands:");
        for task in self.tasks.values() {
            let _ = write!(out, "\n  {:<width$}  {}", task.usage(), task.summary());
        }
        out
    }

    /// Run the task named by `invocation`.
    pub async fn dispatch(&self, ctx: &CliContext, invocation: &Invocation) -> Result<()> {
        let Some(task) = self.get(&invocation.name) else {
            return Err(CliError::UnknownCommand {
                name: invocation.name.clone(),
                listing: self.listing(),
            }
            .into());
        };

        tracing::debug!(
            command = task.name(),
            environment = ?invocation.environment,
            "Dispatching"
        );
        task.run(ctx, invocation).await
    }
}
