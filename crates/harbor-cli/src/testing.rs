//! Test doubles for handler and registry tests.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use harbor_core::{
    Connector, EnvironmentResolver, ExecutionRequest, ExecutionResult, HarborError,
    MigrationReport, ProjectLayout, ProjectSettings, ServerControl, ServerProcess, SessionBridge,
    Signal, Transport,
};
use harbor_runtime::FsMigrationSource;

use crate::bootstrap::CliContext;

/// In-memory server control for one project.
#[derive(Default)]
pub struct FakeControl {
    pid: Mutex<Option<u32>>,
    calls: Mutex<Vec<String>>,
    signals: Mutex<Vec<String>>,
}

impl FakeControl {
    pub fn running(pid: u32) -> Arc<Self> {
        let fake = Self::default();
        *fake.pid.lock().unwrap() = Some(pid);
        Arc::new(fake)
    }

    pub fn stopped() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn signals(&self) -> Vec<String> {
        self.signals.lock().unwrap().clone()
    }

    pub fn pid(&self) -> Option<u32> {
        *self.pid.lock().unwrap()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn process(environment: &str, pid: u32) -> ServerProcess {
    ServerProcess::running(
        pid,
        environment,
        format!("/srv/app/.harbor/{environment}/server.conf"),
        "/usr/sbin/nginx",
        8181,
    )
}

#[async_trait]
impl ServerControl for FakeControl {
    async fn ensure_config(&self, environment: &str) -> Result<PathBuf, HarborError> {
        self.record(format!("ensure_config {environment}"));
        Ok(PathBuf::from(format!("/srv/app/.harbor/{environment}/server.conf")))
    }

    async fn current_pid(&self, _environment: &str) -> Option<u32> {
        self.pid()
    }

    async fn current_process(
        &self,
        environment: &str,
    ) -> Result<Option<ServerProcess>, HarborError> {
        Ok(self.pid().map(|pid| process(environment, pid)))
    }

    async fn start(&self, environment: &str) -> Result<ServerProcess, HarborError> {
        self.record(format!("start {environment}"));
        if let Some(pid) = self.pid() {
            return Err(HarborError::AlreadyRunning {
                environment: environment.to_string(),
                pid,
            });
        }
        *self.pid.lock().unwrap() = Some(5150);
        Ok(process(environment, 5150))
    }

    async fn send_signal(&self, environment: &str, signal: &Signal) -> Result<u32, HarborError> {
        let pid = self.pid().ok_or_else(|| HarborError::ProcessNotRunning {
            environment: environment.to_string(),
        })?;
        self.signals
            .lock()
            .unwrap()
            .push(format!("{environment} {signal}"));
        Ok(pid)
    }

    async fn stop(&self, target: &ServerProcess) -> Result<u32, HarborError> {
        self.record(format!("stop {}", target.environment));
        let mut pid = self.pid.lock().unwrap();
        match target.pid {
            Some(owned) if *pid == Some(owned) => {
                *pid = None;
                Ok(owned)
            }
            _ => Err(HarborError::ProcessNotRunning {
                environment: target.environment.clone(),
            }),
        }
    }
}

/// Echoes code back and reports every migration step as applied.
pub struct EchoConnector;

struct EchoTransport;

#[async_trait]
impl Connector for EchoConnector {
    async fn connect(&self, _target: &ServerProcess) -> Result<Box<dyn Transport>, HarborError> {
        Ok(Box::new(EchoTransport))
    }
}

#[async_trait]
impl Transport for EchoTransport {
    async fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResult, HarborError> {
        match request {
            ExecutionRequest::Code { code, .. } if code.starts_with("error(") => {
                Err(HarborError::ExecutionFailure {
                    detail: code.clone(),
                })
            }
            ExecutionRequest::Code { code, .. } => {
                Ok(ExecutionResult::Output(format!("ran {code}")))
            }
            ExecutionRequest::Migrate { steps, .. } => {
                Ok(ExecutionResult::Migrated(MigrationReport {
                    applied: steps.iter().map(|s| s.key.clone()).collect(),
                    skipped: 0,
                }))
            }
        }
    }
}

/// A CLI context over `root` with `control` and the echo connector.
pub fn context(root: &Path, control: Arc<FakeControl>) -> CliContext {
    let layout = ProjectLayout::new(root);
    let control: Arc<dyn ServerControl> = control;
    CliContext {
        environments: EnvironmentResolver::new(&layout, None),
        settings: Arc::new(ProjectSettings::default()),
        bridge: SessionBridge::new(Arc::clone(&control), Arc::new(EchoConnector)),
        migrations: Arc::new(FsMigrationSource::new(layout.migrations_dir())),
        control,
        layout,
        trace: false,
    }
}
