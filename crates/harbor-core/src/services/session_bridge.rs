//! Session bridge: run a request inside a live server.
//!
//! A session wraps exactly one attach/detach cycle:
//!
//! - a live server is borrowed (persistent session) and never stopped
//! - otherwise a throwaway server is started (ephemeral session) and is
//!   always stopped on detach, whether the request succeeded or not
//!
//! Teardown failures after a successful execution are logged, not returned:
//! the caller's code already ran to completion.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::{ExecutionRequest, ExecutionResult, ServerProcess, SessionMode};
use crate::ports::{Connector, HarborError, ServerControl, Transport};

/// One attach/detach cycle against a server.
pub struct Session {
    mode: SessionMode,
    target: ServerProcess,
    transport: Box<dyn Transport>,
}

impl Session {
    pub const fn mode(&self) -> SessionMode {
        self.mode
    }

    pub const fn target(&self) -> &ServerProcess {
        &self.target
    }

    /// Deliver `request` and wait for the whole response.
    pub async fn execute(
        &self,
        request: &ExecutionRequest,
    ) -> Result<ExecutionResult, HarborError> {
        debug!(
            environment = %self.target.environment,
            mode = %self.mode,
            kind = request.kind(),
            "Delivering request"
        );
        self.transport.execute(request).await
    }
}

/// Opens sessions against a project's servers.
#[derive(Clone)]
pub struct SessionBridge {
    control: Arc<dyn ServerControl>,
    connector: Arc<dyn Connector>,
}

impl SessionBridge {
    pub fn new(control: Arc<dyn ServerControl>, connector: Arc<dyn Connector>) -> Self {
        Self { control, connector }
    }

    /// Run `request` inside the server for `environment`.
    ///
    /// Attaches to the live server if there is one, otherwise provisions an
    /// ephemeral server for the duration of this call.
    pub async fn with_session(
        &self,
        environment: &str,
        request: &ExecutionRequest,
    ) -> Result<ExecutionResult, HarborError> {
        let session = self.open(environment).await?;
        let outcome = session.execute(request).await;
        let teardown = self.close(session).await;

        match (outcome, teardown) {
            (Ok(result), Err(err)) => {
                warn!(
                    environment,
                    error = %err,
                    "Session teardown failed after successful execution"
                );
                Ok(result)
            }
            (Err(err), Err(teardown_err)) => {
                warn!(environment, error = %teardown_err, "Session teardown failed");
                Err(err)
            }
            (outcome, Ok(())) => outcome,
        }
    }

    /// Attach to (or provision) the server and open a transport to it.
    ///
    /// If the transport cannot be opened, an ephemeral server is stopped
    /// before the error is returned.
    pub async fn open(&self, environment: &str) -> Result<Session, HarborError> {
        let (target, mode) = self.acquire(environment).await?;
        info!(environment, mode = %mode, pid = ?target.pid, "Session attached");

        match self.connector.connect(&target).await {
            Ok(transport) => Ok(Session {
                mode,
                target,
                transport,
            }),
            Err(err) => {
                if let Err(teardown_err) = self.release(mode, &target).await {
                    warn!(environment, error = %teardown_err, "Session teardown failed");
                }
                Err(err)
            }
        }
    }

    /// Detach: drop the transport and, for ephemeral sessions, stop the
    /// server the session started.
    pub async fn close(&self, session: Session) -> Result<(), HarborError> {
        let Session {
            mode,
            target,
            transport,
        } = session;
        drop(transport);
        self.release(mode, &target).await?;
        info!(environment = %target.environment, mode = %mode, "Session detached");
        Ok(())
    }

    async fn acquire(
        &self,
        environment: &str,
    ) -> Result<(ServerProcess, SessionMode), HarborError> {
        if let Some(process) = self.control.current_process(environment).await? {
            return Ok((process, SessionMode::Persistent));
        }

        self.control.ensure_config(environment).await?;
        match self.control.start(environment).await {
            Ok(process) => Ok((process, SessionMode::Ephemeral)),
            // Another invocation started a server between our check and our
            // start. Borrow it instead.
            Err(HarborError::AlreadyRunning { pid, .. }) => {
                debug!(environment, pid, "Server appeared concurrently, attaching");
                let process = self
                    .control
                    .current_process(environment)
                    .await?
                    .ok_or_else(|| HarborError::ProcessNotRunning {
                        environment: environment.to_string(),
                    })?;
                Ok((process, SessionMode::Persistent))
            }
            Err(err) => Err(err),
        }
    }

    /// Stop `target` if this session started it. Keyed on the target's own
    /// pid, so a server another invocation started meanwhile survives.
    async fn release(&self, mode: SessionMode, target: &ServerProcess) -> Result<(), HarborError> {
        if mode.owns_process() {
            let pid = self.control.stop(target).await?;
            debug!(environment = %target.environment, pid, "Ephemeral server stopped");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MockServerControl;
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Server control fake that tracks one environment's PID record.
    #[derive(Default)]
    struct FakeControl {
        pid: Mutex<Option<u32>>,
        calls: Mutex<Vec<&'static str>>,
        stopped: Mutex<Vec<u32>>,
        fail_start: bool,
    }

    impl FakeControl {
        fn running(pid: u32) -> Self {
            Self {
                pid: Mutex::new(Some(pid)),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }

        fn process(environment: &str, pid: u32) -> ServerProcess {
            ServerProcess::running(pid, environment, "/tmp/server.conf", "/usr/sbin/nginx", 8181)
        }
    }

    #[async_trait]
    impl ServerControl for FakeControl {
        async fn ensure_config(&self, _environment: &str) -> Result<PathBuf, HarborError> {
            self.calls.lock().unwrap().push("ensure_config");
            Ok(PathBuf::from("/tmp/server.conf"))
        }

        async fn current_pid(&self, _environment: &str) -> Option<u32> {
            *self.pid.lock().unwrap()
        }

        async fn current_process(
            &self,
            environment: &str,
        ) -> Result<Option<ServerProcess>, HarborError> {
            Ok(self
                .pid
                .lock()
                .unwrap()
                .map(|pid| Self::process(environment, pid)))
        }

        async fn start(&self, environment: &str) -> Result<ServerProcess, HarborError> {
            self.calls.lock().unwrap().push("start");
            if self.fail_start {
                return Err(HarborError::StartupTimeout {
                    environment: environment.to_string(),
                    waited_ms: 10,
                });
            }
            *self.pid.lock().unwrap() = Some(777);
            Ok(Self::process(environment, 777))
        }

        async fn send_signal(
            &self,
            environment: &str,
            _signal: &crate::domain::Signal,
        ) -> Result<u32, HarborError> {
            self.current_pid(environment)
                .await
                .ok_or_else(|| HarborError::ProcessNotRunning {
                    environment: environment.to_string(),
                })
        }

        async fn stop(&self, target: &ServerProcess) -> Result<u32, HarborError> {
            self.calls.lock().unwrap().push("stop");
            let mut record = self.pid.lock().unwrap();
            match target.pid {
                Some(pid) if *record == Some(pid) => {
                    *record = None;
                    self.stopped.lock().unwrap().push(pid);
                    Ok(pid)
                }
                _ => Err(HarborError::ProcessNotRunning {
                    environment: target.environment.clone(),
                }),
            }
        }
    }

    /// Evaluates `a+b` style sums; anything else raises.
    struct ArithmeticTransport;

    #[async_trait]
    impl Transport for ArithmeticTransport {
        async fn execute(
            &self,
            request: &ExecutionRequest,
        ) -> Result<ExecutionResult, HarborError> {
            let ExecutionRequest::Code { code, .. } = request else {
                return Err(HarborError::transport("unsupported request"));
            };
            let sum: Option<i64> = code
                .split('+')
                .map(|part| part.trim().parse::<i64>().ok())
                .sum();
            sum.map(|total| ExecutionResult::Output(total.to_string()))
                .ok_or_else(|| HarborError::ExecutionFailure {
                    detail: format!("cannot evaluate '{code}'"),
                })
        }
    }

    /// Hands the environment to another server while the request runs, as
    /// if the ephemeral server died and `harbor server` took over.
    struct TakeoverTransport(Arc<FakeControl>);

    #[async_trait]
    impl Transport for TakeoverTransport {
        async fn execute(
            &self,
            _request: &ExecutionRequest,
        ) -> Result<ExecutionResult, HarborError> {
            *self.0.pid.lock().unwrap() = Some(888);
            Ok(ExecutionResult::Output("done".into()))
        }
    }

    struct TakeoverConnector(Arc<FakeControl>);

    #[async_trait]
    impl Connector for TakeoverConnector {
        async fn connect(
            &self,
            _target: &ServerProcess,
        ) -> Result<Box<dyn Transport>, HarborError> {
            Ok(Box::new(TakeoverTransport(self.0.clone())))
        }
    }

    struct FakeConnector {
        refuse: bool,
        seen: Mutex<Vec<u32>>,
    }

    impl FakeConnector {
        fn new() -> Self {
            Self {
                refuse: false,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Connector for FakeConnector {
        async fn connect(&self, target: &ServerProcess) -> Result<Box<dyn Transport>, HarborError> {
            self.seen.lock().unwrap().push(target.pid.unwrap_or_default());
            if self.refuse {
                return Err(HarborError::transport("connection refused"));
            }
            Ok(Box::new(ArithmeticTransport))
        }
    }

    fn bridge(control: Arc<FakeControl>, connector: Arc<FakeConnector>) -> SessionBridge {
        SessionBridge::new(control, connector)
    }

    #[tokio::test]
    async fn exec_without_server_provisions_and_tears_down_ephemeral() {
        let control = Arc::new(FakeControl::default());
        let connector = Arc::new(FakeConnector::new());

        let result = bridge(control.clone(), connector.clone())
            .with_session("development", &ExecutionRequest::code("1+1", false))
            .await
            .unwrap();

        assert_eq!(result, ExecutionResult::Output("2".into()));
        assert_eq!(control.calls(), ["ensure_config", "start", "stop"]);
        assert_eq!(*connector.seen.lock().unwrap(), [777]);
        assert_eq!(control.current_pid("development").await, None);
    }

    #[tokio::test]
    async fn ephemeral_server_is_stopped_when_execution_fails() {
        let control = Arc::new(FakeControl::default());
        let connector = Arc::new(FakeConnector::new());

        let err = bridge(control.clone(), connector)
            .with_session("development", &ExecutionRequest::code("nil+1", false))
            .await
            .unwrap_err();

        assert!(matches!(err, HarborError::ExecutionFailure { .. }));
        assert_eq!(control.calls(), ["ensure_config", "start", "stop"]);
        assert_eq!(control.current_pid("development").await, None);
    }

    #[tokio::test]
    async fn ephemeral_server_is_stopped_when_connect_fails() {
        let control = Arc::new(FakeControl::default());
        let connector = Arc::new(FakeConnector {
            refuse: true,
            seen: Mutex::new(Vec::new()),
        });

        let err = bridge(control.clone(), connector)
            .with_session("development", &ExecutionRequest::code("1+1", false))
            .await
            .unwrap_err();

        assert!(matches!(err, HarborError::Transport { .. }));
        assert_eq!(control.calls(), ["ensure_config", "start", "stop"]);
    }

    #[tokio::test]
    async fn teardown_never_stops_a_server_it_did_not_start() {
        let control = Arc::new(FakeControl::default());
        let connector = Arc::new(TakeoverConnector(control.clone()));

        let result = SessionBridge::new(control.clone(), connector)
            .with_session("development", &ExecutionRequest::code("1+1", false))
            .await
            .unwrap();

        assert_eq!(result, ExecutionResult::Output("done".into()));
        assert_eq!(control.calls(), ["ensure_config", "start", "stop"]);
        assert!(control.stopped.lock().unwrap().is_empty());
        assert_eq!(control.current_pid("development").await, Some(888));
    }

    #[tokio::test]
    async fn teardown_stops_the_started_pid() {
        let control = Arc::new(FakeControl::default());

        bridge(control.clone(), Arc::new(FakeConnector::new()))
            .with_session("development", &ExecutionRequest::code("1+1", false))
            .await
            .unwrap();

        assert_eq!(*control.stopped.lock().unwrap(), [777]);
    }

    #[tokio::test]
    async fn running_server_is_borrowed_not_stopped() {
        let control = Arc::new(FakeControl::running(4242));
        let connector = Arc::new(FakeConnector::new());

        let result = bridge(control.clone(), connector.clone())
            .with_session("production", &ExecutionRequest::code("40+2", false))
            .await
            .unwrap();

        assert_eq!(result, ExecutionResult::Output("42".into()));
        assert!(control.calls().is_empty());
        assert_eq!(*connector.seen.lock().unwrap(), [4242]);
        assert_eq!(control.current_pid("production").await, Some(4242));
    }

    #[tokio::test]
    async fn startup_failure_surfaces_without_teardown() {
        let control = Arc::new(FakeControl {
            fail_start: true,
            ..FakeControl::default()
        });
        let connector = Arc::new(FakeConnector::new());

        let err = bridge(control.clone(), connector.clone())
            .with_session("development", &ExecutionRequest::code("1+1", false))
            .await
            .unwrap_err();

        assert!(matches!(err, HarborError::StartupTimeout { .. }));
        assert_eq!(control.calls(), ["ensure_config", "start"]);
        assert!(connector.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn teardown_failure_does_not_override_success() {
        let mut control = MockServerControl::new();
        control.expect_current_process().returning(|_| Ok(None));
        control
            .expect_ensure_config()
            .returning(|_| Ok(PathBuf::from("/tmp/server.conf")));
        control
            .expect_start()
            .returning(|env| Ok(FakeControl::process(env, 9)));
        control
            .expect_stop()
            .times(1)
            .returning(|_| Err(HarborError::StopFailed("process 9 did not exit".into())));

        let result = SessionBridge::new(Arc::new(control), Arc::new(FakeConnector::new()))
            .with_session("development", &ExecutionRequest::code("1+1", false))
            .await
            .unwrap();

        assert_eq!(result, ExecutionResult::Output("2".into()));
    }

    #[tokio::test]
    async fn concurrent_start_falls_back_to_persistent() {
        let mut control = MockServerControl::new();
        let mut lookups = 0;
        control.expect_current_process().returning(move |env| {
            lookups += 1;
            Ok((lookups > 1).then(|| FakeControl::process(env, 31)))
        });
        control
            .expect_ensure_config()
            .returning(|_| Ok(PathBuf::from("/tmp/server.conf")));
        control.expect_start().returning(|env| {
            Err(HarborError::AlreadyRunning {
                environment: env.to_string(),
                pid: 31,
            })
        });
        control.expect_stop().never();

        let bridge = SessionBridge::new(Arc::new(control), Arc::new(FakeConnector::new()));
        let session = bridge.open("development").await.unwrap();
        assert_eq!(session.mode(), SessionMode::Persistent);
        assert_eq!(session.target().pid, Some(31));
        bridge.close(session).await.unwrap();
    }
}
