//! Commands dispatched through the registry against a bootstrapped project.
//!
//! `/bin/sh` stands in for the server binary. It ignores SIGHUP, writes its
//! PID record and `exec`s into `sleep`.
#![cfg(unix)]

use std::path::Path;

use harbor_cli::{CliConfig, CliError, CommandRegistry, Invocation, bootstrap};
use harbor_core::ServerControl as _;

const LAUNCH: &str = "trap '' HUP; echo $$ > {pid_path}; exec sleep 30";

fn write_project(root: &Path) {
    let settings = serde_json::json!({
        "server_binary": "/bin/sh",
        "defaults": {
            "control_port": 18191,
            "startup_timeout_secs": 5,
            "launch_args": ["-c", LAUNCH],
            "vars": { "GREETING": "hello" }
        }
    });
    std::fs::write(root.join("harbor.json"), settings.to_string()).unwrap();
    std::fs::write(
        root.join("server.conf"),
        "# ${{GREETING}}\npid ${{PID_PATH}};\nlisten ${{PORT}};\n",
    )
    .unwrap();
}

fn config(root: &Path) -> CliConfig {
    CliConfig {
        project_root: root.to_path_buf(),
        env_override: Some("test".into()),
        binary_override: None,
        trace: false,
    }
}

#[tokio::test]
async fn server_hup_and_build_against_real_process() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path());
    let ctx = bootstrap(config(dir.path())).unwrap();
    let registry = CommandRegistry::standard();

    registry.dispatch(&ctx, &Invocation::new("server")).await.unwrap();

    let rendered = std::fs::read_to_string(ctx.layout.config_path("test")).unwrap();
    assert!(rendered.starts_with("# hello\n"));
    assert!(rendered.contains("listen 8080;"));
    let pid = ctx.control.current_pid("test").await.expect("server should be running");

    let err = registry
        .dispatch(&ctx, &Invocation::new("server"))
        .await
        .unwrap_err();
    assert_eq!(CliError::classify(&err).exit_code(), 71);

    registry.dispatch(&ctx, &Invocation::new("hup")).await.unwrap();
    registry.dispatch(&ctx, &Invocation::new("build")).await.unwrap();
    assert_eq!(ctx.control.current_pid("test").await, Some(pid));

    let process = ctx.control.current_process("test").await.unwrap().unwrap();
    assert_eq!(ctx.control.stop(&process).await.unwrap(), pid);
    assert!(!ctx.layout.pid_path("test").exists());
}

#[tokio::test]
async fn signals_without_server_fail_as_process_errors() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path());
    let ctx = bootstrap(config(dir.path())).unwrap();

    let err = CommandRegistry::standard()
        .dispatch(&ctx, &Invocation::new("term").with_environment(Some("production".into())))
        .await
        .unwrap_err();

    let err = CliError::classify(&err);
    assert_eq!(err.exit_code(), 71);
    assert!(err.to_string().contains("'production'"));
}

#[tokio::test]
async fn unknown_signal_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path());
    let ctx = bootstrap(config(dir.path())).unwrap();

    let err = CommandRegistry::standard()
        .dispatch(&ctx, &Invocation::new("signal").with_argument("SIGBOGUS"))
        .await
        .unwrap_err();

    assert_eq!(CliError::classify(&err).exit_code(), 2);
}

#[tokio::test]
async fn paths_and_bad_environment_names() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path());
    let ctx = bootstrap(config(dir.path())).unwrap();
    let registry = CommandRegistry::standard();

    registry.dispatch(&ctx, &Invocation::new("paths")).await.unwrap();
    assert!(!ctx.layout.state_dir("test").exists(), "paths must not create anything");

    let err = registry
        .dispatch(&ctx, &Invocation::new("paths").with_environment(Some("../etc".into())))
        .await
        .unwrap_err();
    assert_eq!(CliError::classify(&err).exit_code(), 2);
}
