//! [`ServerControl`] over real OS processes.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use harbor_core::{
    EnvironmentSettings, HarborError, ProjectLayout, ProjectSettings, ServerControl,
    ServerProcess, Signal,
};
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::launch::expand_launch_args;
use super::readiness::{Readiness, wait_for_pid_record};
use super::shutdown::{shutdown_child, terminate_pid};
use super::signals::resolve_signal;
use super::{OsProcesses, ProcessProbe};
use crate::binary::BinaryLocator;
use crate::config::ConfigCoordinator;
use crate::pidfile::{delete_pid_record, read_pid_record};

/// How often a starting server's PID record is checked.
pub const READINESS_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// How long a server gets to exit after SIGTERM before SIGKILL.
pub const STOP_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// Controls the servers of one project.
pub struct ProcessController {
    layout: ProjectLayout,
    settings: Arc<ProjectSettings>,
    locator: Arc<BinaryLocator>,
    config: ConfigCoordinator,
    probe: Arc<dyn ProcessProbe>,
    poll_interval: Duration,
    stop_grace: Duration,
    /// Servers spawned by this invocation that did not daemonize, by
    /// environment. Kept so they can be reaped on stop.
    spawned: Mutex<HashMap<String, Child>>,
}

impl ProcessController {
    pub fn new(
        layout: ProjectLayout,
        settings: Arc<ProjectSettings>,
        locator: Arc<BinaryLocator>,
        config: ConfigCoordinator,
    ) -> Self {
        Self {
            layout,
            settings,
            locator,
            config,
            probe: Arc::new(OsProcesses),
            poll_interval: READINESS_POLL_INTERVAL,
            stop_grace: STOP_GRACE_PERIOD,
            spawned: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn with_probe(mut self, probe: Arc<dyn ProcessProbe>) -> Self {
        self.probe = probe;
        self
    }

    #[must_use]
    pub const fn with_timings(mut self, poll_interval: Duration, stop_grace: Duration) -> Self {
        self.poll_interval = poll_interval;
        self.stop_grace = stop_grace;
        self
    }

    fn environment(&self, environment: &str) -> Result<EnvironmentSettings, HarborError> {
        Ok(self.settings.for_environment(environment)?)
    }

    fn not_running(environment: &str) -> HarborError {
        HarborError::ProcessNotRunning {
            environment: environment.to_string(),
        }
    }

    /// Take the spawned child for `environment` if it is the process `pid`.
    async fn take_owned(&self, environment: &str, pid: u32) -> Option<Child> {
        let mut spawned = self.spawned.lock().await;
        if spawned.get(environment)?.id() != Some(pid) {
            return None;
        }
        spawned.remove(environment)
    }

    /// Delete the PID record after `pid` stopped, unless it now names a
    /// different live server.
    fn release_record(&self, environment: &str, pid: u32) -> Result<(), HarborError> {
        let pid_path = self.layout.pid_path(environment);
        match read_pid_record(&pid_path) {
            Ok(recorded) if recorded != pid && self.probe.is_alive(recorded) => {
                warn!(environment, pid, recorded, "PID record names another server, keeping it");
                Ok(())
            }
            _ => Ok(delete_pid_record(&pid_path)?),
        }
    }
}

#[async_trait]
impl ServerControl for ProcessController {
    async fn ensure_config(&self, environment: &str) -> Result<PathBuf, HarborError> {
        self.config.ensure_config(environment)
    }

    async fn current_pid(&self, environment: &str) -> Option<u32> {
        let path = self.layout.pid_path(environment);
        match read_pid_record(&path) {
            Ok(pid) if self.probe.is_alive(pid) => Some(pid),
            Ok(pid) => {
                debug!(environment, pid, "Stale PID record");
                None
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                debug!(environment, path = %path.display(), error = %e, "Unreadable PID record");
                None
            }
        }
    }

    async fn current_process(
        &self,
        environment: &str,
    ) -> Result<Option<ServerProcess>, HarborError> {
        let Some(pid) = self.current_pid(environment).await else {
            return Ok(None);
        };
        let env = self.environment(environment)?;

        // The binary is informational for a server that is already up.
        let binary = self.locator.locate().unwrap_or_default();

        Ok(Some(ServerProcess::running(
            pid,
            environment,
            self.layout.config_path(environment),
            binary,
            env.control_port,
        )))
    }

    async fn start(&self, environment: &str) -> Result<ServerProcess, HarborError> {
        let env = self.environment(environment)?;

        if let Some(pid) = self.current_pid(environment).await {
            return Err(HarborError::AlreadyRunning {
                environment: environment.to_string(),
                pid,
            });
        }

        let binary = self.locator.locate()?;
        let config_path = self.layout.config_path(environment);
        if !config_path.is_file() {
            return Err(HarborError::StartFailed(format!(
                "configuration {} has not been rendered",
                config_path.display()
            )));
        }

        let pid_path = self.layout.pid_path(environment);
        delete_pid_record(&pid_path)?;

        let args = expand_launch_args(
            &env.launch_args,
            &self.layout.state_dir(environment),
            &config_path,
            &pid_path,
        );
        info!(environment, binary = %binary.display(), ?args, "Starting server");

        let mut command = Command::new(&binary);
        command
            .args(&args)
            .current_dir(self.layout.root())
            .stdin(Stdio::null())
            .stdout(Stdio::null());
        // Keep the server out of the terminal's process group so Ctrl-C
        // on the CLI does not reach it.
        #[cfg(unix)]
        command.process_group(0);

        let mut launcher = command.spawn().map_err(|e| {
            HarborError::StartFailed(format!("cannot launch {}: {e}", binary.display()))
        })?;

        let timeout = Duration::from_secs(env.startup_timeout_secs);
        let readiness = wait_for_pid_record(
            &pid_path,
            self.probe.as_ref(),
            &mut launcher,
            timeout,
            self.poll_interval,
        )
        .await;

        match readiness {
            Readiness::Ready(pid) => {
                if launcher.id() == Some(pid) {
                    self.spawned
                        .lock()
                        .await
                        .insert(environment.to_string(), launcher);
                }
                info!(environment, pid, "Server ready");
                Ok(ServerProcess::running(
                    pid,
                    environment,
                    config_path,
                    binary,
                    env.control_port,
                ))
            }
            Readiness::Exited(status) => Err(HarborError::StartFailed(format!(
                "{} exited with {status} before writing {}",
                binary.display(),
                pid_path.display()
            ))),
            Readiness::TimedOut => {
                warn!(environment, "Server did not publish a PID record, killing launcher");
                if let Err(e) = shutdown_child(launcher, self.stop_grace).await {
                    debug!(environment, error = %e, "Launcher cleanup failed");
                }
                Err(HarborError::StartupTimeout {
                    environment: environment.to_string(),
                    waited_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                })
            }
        }
    }

    async fn send_signal(&self, environment: &str, signal: &Signal) -> Result<u32, HarborError> {
        let signo = resolve_signal(signal)?;
        let pid = self
            .current_pid(environment)
            .await
            .ok_or_else(|| Self::not_running(environment))?;

        self.probe.deliver(pid, signo).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                Self::not_running(environment)
            } else {
                HarborError::Io(e)
            }
        })?;

        info!(environment, pid, signal = %signal, "Signal sent");
        Ok(pid)
    }

    async fn stop(&self, target: &ServerProcess) -> Result<u32, HarborError> {
        let environment = target.environment.as_str();
        let Some(pid) = target.pid else {
            return Err(Self::not_running(environment));
        };

        let owned = self.take_owned(environment, pid).await;
        if owned.is_none() && !self.probe.is_alive(pid) {
            self.release_record(environment, pid)?;
            return Err(Self::not_running(environment));
        }

        info!(environment, pid, "Stopping server");
        let stopped = match owned {
            Some(child) => shutdown_child(child, self.stop_grace).await.map(|_| ()),
            None => {
                terminate_pid(self.probe.as_ref(), pid, self.stop_grace, self.poll_interval).await
            }
        };
        stopped.map_err(|e| HarborError::StopFailed(format!("pid {pid}: {e}")))?;

        self.release_record(environment, pid)?;
        info!(environment, pid, "Server stopped");
        Ok(pid)
    }
}
