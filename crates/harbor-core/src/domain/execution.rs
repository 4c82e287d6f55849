//! Requests executed inside a server process and their results.

use serde::{Deserialize, Serialize};

use super::migration::{MigrationKey, MigrationStep, sort_steps};

/// Work to run inside the live server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionRequest {
    /// A single code fragment.
    Code {
        code: String,
        /// Keep the full remote traceback on failure.
        trace: bool,
    },
    /// An ordered batch of migration steps, executed as one request.
    Migrate {
        steps: Vec<MigrationStep>,
        trace: bool,
    },
}

impl ExecutionRequest {
    /// Build a code request.
    pub fn code(code: impl Into<String>, trace: bool) -> Self {
        Self::Code {
            code: code.into(),
            trace,
        }
    }

    /// Build a migration batch, sorting the steps into ascending key order.
    pub fn migrate(mut steps: Vec<MigrationStep>, trace: bool) -> Self {
        sort_steps(&mut steps);
        Self::Migrate { steps, trace }
    }

    /// Whether the caller asked for full remote tracebacks.
    pub const fn trace(&self) -> bool {
        match self {
            Self::Code { trace, .. } | Self::Migrate { trace, .. } => *trace,
        }
    }

    /// Short label for logging.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Code { .. } => "exec",
            Self::Migrate { .. } => "migrate",
        }
    }
}

/// Summary of a migration batch that completed without failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationReport {
    /// Steps applied by this batch, in the order they ran.
    pub applied: Vec<MigrationKey>,
    /// Steps skipped because they were already recorded as applied.
    pub skipped: usize,
}

impl MigrationReport {
    /// Whether the batch had nothing to do.
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Successful outcome of an [`ExecutionRequest`].
///
/// Failures travel as `HarborError::ExecutionFailure` or
/// `HarborError::MigrationStepFailure`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionResult {
    /// Output of a code fragment, returned whole.
    Output(String),
    /// Outcome of a migration batch.
    Migrated(MigrationReport),
}
