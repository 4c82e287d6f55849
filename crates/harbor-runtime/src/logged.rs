//! Logging decorator for [`ServerControl`].

use std::future::Future;
use std::path::PathBuf;
use std::time::Instant;

use async_trait::async_trait;
use harbor_core::{HarborError, ServerControl, ServerProcess, Signal};
use tracing::{Instrument, debug, info_span};

/// Wraps a [`ServerControl`] and traces every call and its outcome.
#[derive(Debug)]
pub struct LoggedControl<C> {
    inner: C,
}

impl<C: ServerControl> LoggedControl<C> {
    pub const fn new(inner: C) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

async fn observe<T, F>(
    operation: &'static str,
    environment: &str,
    call: F,
) -> Result<T, HarborError>
where
    T: Send,
    F: Future<Output = Result<T, HarborError>> + Send,
{
    let span = info_span!("server_control", operation, environment);
    async move {
        let started = Instant::now();
        debug!("Calling");
        let result = call.await;
        let elapsed_ms = started.elapsed().as_millis();
        match &result {
            Ok(_) => debug!(elapsed_ms, "Succeeded"),
            Err(e) => debug!(elapsed_ms, error = %e, "Failed"),
        }
        result
    }
    .instrument(span)
    .await
}

#[async_trait]
impl<C: ServerControl> ServerControl for LoggedControl<C> {
    async fn ensure_config(&self, environment: &str) -> Result<PathBuf, HarborError> {
        observe("ensure_config", environment, self.inner.ensure_config(environment)).await
    }

    async fn current_pid(&self, environment: &str) -> Option<u32> {
        let pid = self.inner.current_pid(environment).await;
        debug!(environment, ?pid, "PID lookup");
        pid
    }

    async fn current_process(
        &self,
        environment: &str,
    ) -> Result<Option<ServerProcess>, HarborError> {
        observe("current_process", environment, self.inner.current_process(environment)).await
    }

    async fn start(&self, environment: &str) -> Result<ServerProcess, HarborError> {
        observe("start", environment, self.inner.start(environment)).await
    }

    async fn send_signal(&self, environment: &str, signal: &Signal) -> Result<u32, HarborError> {
        debug!(environment, %signal, "Sending signal");
        observe("send_signal", environment, self.inner.send_signal(environment, signal)).await
    }

    async fn stop(&self, target: &ServerProcess) -> Result<u32, HarborError> {
        debug!(environment = %target.environment, pid = ?target.pid, "Stopping owned server");
        observe("stop", &target.environment, self.inner.stop(target)).await
    }
}
