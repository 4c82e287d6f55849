//! Control-endpoint transport port.

use async_trait::async_trait;

use super::HarborError;
use crate::domain::{ExecutionRequest, ExecutionResult, ServerProcess};

/// Opens transports to a server's control endpoint.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Open a transport to `target`.
    ///
    /// Only connection setup may time out; the execution itself never does.
    async fn connect(&self, target: &ServerProcess) -> Result<Box<dyn Transport>, HarborError>;
}

/// One open channel into a live server.
///
/// Dropping the transport releases it.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver `request` and wait for the whole response.
    ///
    /// Remote failures come back as `HarborError::ExecutionFailure` or
    /// `HarborError::MigrationStepFailure`; an unreachable endpoint or an
    /// undecodable answer is `HarborError::Transport`.
    async fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResult, HarborError>;
}
