//! JSON-over-HTTP transport to `127.0.0.1:<control_port>`.

use std::time::Duration;

use async_trait::async_trait;
use harbor_core::contracts::{
    EXEC_PATH, ExecReply, ExecRequestBody, MIGRATE_PATH, MigrateReply, MigrateRequestBody,
};
use harbor_core::{
    Connector, ExecutionRequest, ExecutionResult, HarborError, ServerProcess, Transport,
};
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// How long establishing a connection may take.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Longest body excerpt quoted in a transport error.
const EXCERPT_LEN: usize = 200;

/// Opens [`HttpTransport`]s.
#[derive(Debug, Clone)]
pub struct HttpConnector {
    connect_timeout: Duration,
}

impl HttpConnector {
    pub const fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

impl Default for HttpConnector {
    fn default() -> Self {
        Self::new(CONNECT_TIMEOUT)
    }
}

#[async_trait]
impl Connector for HttpConnector {
    async fn connect(&self, target: &ServerProcess) -> Result<Box<dyn Transport>, HarborError> {
        // No request timeout: remote code runs as long as it needs.
        let client = Client::builder()
            .connect_timeout(self.connect_timeout)
            .build()
            .map_err(HarborError::transport)?;

        Ok(Box::new(HttpTransport::new(client, target.control_url())))
    }
}

/// One client bound to a server's control endpoint.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, HarborError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "POST control request");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| HarborError::transport(format!("{url}: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| HarborError::transport(format!("{url}: {e}")))?;

        if !status.is_success() {
            return Err(HarborError::transport(format!(
                "{url} answered {status}: {}",
                excerpt(&text)
            )));
        }

        serde_json::from_str(&text).map_err(|e| {
            HarborError::transport(format!("{url} sent an invalid reply ({e}): {}", excerpt(&text)))
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResult, HarborError> {
        match request {
            ExecutionRequest::Code { code, trace } => {
                let body = ExecRequestBody {
                    code: code.clone(),
                    trace: *trace,
                };
                let reply: ExecReply = self.post(EXEC_PATH, &body).await?;
                reply.into_result(*trace)
            }
            ExecutionRequest::Migrate { steps, trace } => {
                let body = MigrateRequestBody {
                    steps: steps.clone(),
                    trace: *trace,
                };
                let reply: MigrateReply = self.post(MIGRATE_PATH, &body).await?;
                reply.into_result(*trace)
            }
        }
    }
}

fn excerpt(text: &str) -> &str {
    let text = text.trim();
    match text.char_indices().nth(EXCERPT_LEN) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
