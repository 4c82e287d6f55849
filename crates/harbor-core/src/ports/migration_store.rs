//! Server-side migration bookkeeping port.
//!
//! This is the port a server runtime implements to execute migration
//! batches with [`crate::services::apply_batch`]. The CLI never implements
//! it; it only sends the batch.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::{MigrationKey, MigrationStep};

/// An error raised by code running inside the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFailure {
    /// Error message. May span several lines.
    pub message: String,
    /// Remote stack context, if the runtime captured one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traceback: Option<String>,
}

impl RemoteFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            traceback: None,
        }
    }

    #[must_use]
    pub fn with_traceback(mut self, traceback: impl Into<String>) -> Self {
        self.traceback = Some(traceback.into());
        self
    }

    /// Text reported to the user.
    ///
    /// Without `trace` only the first line of the message is kept. With it,
    /// the whole message and the traceback are preserved.
    pub fn detail(&self, trace: bool) -> String {
        if trace {
            match &self.traceback {
                Some(tb) if !tb.trim().is_empty() => {
                    format!("{}\n{}", self.message.trim_end(), tb.trim_end())
                }
                _ => self.message.trim_end().to_string(),
            }
        } else {
            self.message.lines().next().unwrap_or_default().trim().to_string()
        }
    }
}

/// Applied-migration bookkeeping inside the server.
pub trait MigrationStore {
    /// Create the migrations table if it does not exist.
    fn ensure_table(&mut self) -> Result<(), RemoteFailure>;

    /// Keys already recorded as applied.
    fn applied(&self) -> Result<BTreeSet<MigrationKey>, RemoteFailure>;

    /// Run one step's code.
    fn run_step(&mut self, step: &MigrationStep) -> Result<(), RemoteFailure>;

    /// Record `key` as applied.
    fn record_applied(&mut self, key: &MigrationKey) -> Result<(), RemoteFailure>;

    /// Run `step` and record it as applied, as one unit.
    ///
    /// Stores backed by a transactional database should override this to
    /// wrap both calls in one transaction.
    fn apply(&mut self, step: &MigrationStep) -> Result<(), RemoteFailure> {
        self.run_step(step)?;
        self.record_applied(&step.key)
    }
}
