//! JSON contract of the server's control endpoint.
//!
//! The endpoint listens on `127.0.0.1:<control_port>`:
//!
//! ```text
//! POST /_harbor/exec     {"code": "...", "trace": false}
//!   -> {"ok": true, "output": "..."}
//!   -> {"ok": false, "error": "...", "traceback": "..."}
//!
//! POST /_harbor/migrate  {"steps": [{"key": "1", "code": "..."}], "trace": false}
//!   -> {"ok": true, "applied": ["2"], "skipped": 1}
//!   -> {"ok": false, "applied": [], "failed_step": "3", "error": "...", "traceback": "..."}
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::{ExecutionResult, MigrationKey, MigrationReport, MigrationStep};
use crate::ports::{HarborError, RemoteFailure};

/// Path of the code execution route.
pub const EXEC_PATH: &str = "/_harbor/exec";

/// Path of the migration batch route.
pub const MIGRATE_PATH: &str = "/_harbor/migrate";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecRequestBody {
    pub code: String,
    #[serde(default)]
    pub trace: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecReply {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traceback: Option<String>,
}

impl ExecReply {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            ok: true,
            output: Some(output.into()),
            ..Self::default()
        }
    }

    pub fn failure(failure: RemoteFailure) -> Self {
        Self {
            ok: false,
            output: None,
            error: Some(failure.message),
            traceback: failure.traceback,
        }
    }

    /// Convert the reply into the caller-facing result.
    pub fn into_result(self, trace: bool) -> Result<ExecutionResult, HarborError> {
        if self.ok {
            return Ok(ExecutionResult::Output(self.output.unwrap_or_default()));
        }
        let failure = RemoteFailure {
            message: self.error.unwrap_or_else(|| "remote execution failed".to_string()),
            traceback: self.traceback,
        };
        Err(HarborError::ExecutionFailure {
            detail: failure.detail(trace),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrateRequestBody {
    pub steps: Vec<MigrationStep>,
    #[serde(default)]
    pub trace: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrateReply {
    pub ok: bool,
    #[serde(default)]
    pub applied: Vec<MigrationKey>,
    #[serde(default)]
    pub skipped: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_step: Option<MigrationKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traceback: Option<String>,
}

impl MigrateReply {
    /// Convert the reply into the caller-facing result.
    ///
    /// A reply whose `applied` list is not strictly ascending is rejected:
    /// the server broke the ordering contract and its bookkeeping cannot be
    /// trusted.
    pub fn into_result(self, trace: bool) -> Result<ExecutionResult, HarborError> {
        if self.applied.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(HarborError::transport(
                "server applied migrations out of ascending key order",
            ));
        }

        if self.ok {
            return Ok(ExecutionResult::Migrated(MigrationReport {
                applied: self.applied,
                skipped: self.skipped,
            }));
        }

        let failure = RemoteFailure {
            message: self.error.unwrap_or_else(|| "migration failed".to_string()),
            traceback: self.traceback,
        };
        match self.failed_step {
            Some(step) => Err(HarborError::MigrationStepFailure {
                step_name: step.to_string(),
                detail: failure.detail(trace),
            }),
            // Failed before any step ran, e.g. while creating the table.
            None => Err(HarborError::ExecutionFailure {
                detail: failure.detail(trace),
            }),
        }
    }
}
