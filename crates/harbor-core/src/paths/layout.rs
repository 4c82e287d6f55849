//! Well-known per-project and per-environment paths.

use std::fmt;
use std::path::{Path, PathBuf};

/// Settings file name at the project root.
pub const SETTINGS_FILE: &str = "harbor.json";

/// File whose first line names the default environment.
pub const ENVIRONMENT_FILE: &str = "harbor_environment";

/// Directory holding one file per migration step.
pub const MIGRATIONS_DIR: &str = "migrations";

/// Directory holding per-environment runtime state.
pub const STATE_DIR: &str = ".harbor";

/// Resolved paths for one project root.
///
/// Per-environment state lives under `<root>/.harbor/<environment>/`:
///
/// ```text
/// .harbor/development/server.conf   rendered configuration
/// .harbor/development/server.pid    PID record
/// .harbor/development/logs/         server logs
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn settings_path(&self) -> PathBuf {
        self.root.join(SETTINGS_FILE)
    }

    pub fn environment_file(&self) -> PathBuf {
        self.root.join(ENVIRONMENT_FILE)
    }

    pub fn migrations_dir(&self) -> PathBuf {
        self.root.join(MIGRATIONS_DIR)
    }

    /// State directory of one environment; also the server's prefix.
    pub fn state_dir(&self, environment: &str) -> PathBuf {
        self.root.join(STATE_DIR).join(environment)
    }

    /// Rendered configuration of one environment.
    pub fn config_path(&self, environment: &str) -> PathBuf {
        self.state_dir(environment).join("server.conf")
    }

    /// PID record of one environment.
    pub fn pid_path(&self, environment: &str) -> PathBuf {
        self.state_dir(environment).join("server.pid")
    }

    pub fn logs_dir(&self, environment: &str) -> PathBuf {
        self.state_dir(environment).join("logs")
    }

    /// Resolve a settings-relative path against the project root.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Snapshot of every path for one environment, for diagnostics.
    pub fn describe(&self, environment: &str) -> ResolvedPaths {
        ResolvedPaths {
            environment: environment.to_string(),
            root: self.root.clone(),
            settings: self.settings_path(),
            migrations: self.migrations_dir(),
            config: self.config_path(environment),
            pid: self.pid_path(environment),
            logs: self.logs_dir(environment),
        }
    }
}

/// Printable set of resolved paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub environment: String,
    pub root: PathBuf,
    pub settings: PathBuf,
    pub migrations: PathBuf,
    pub config: PathBuf,
    pub pid: PathBuf,
    pub logs: PathBuf,
}

impl fmt::Display for ResolvedPaths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "environment = {}", self.environment)?;
        writeln!(f, "project_root = {}", self.root.display())?;
        writeln!(f, "settings = {}", self.settings.display())?;
        writeln!(f, "migrations = {}", self.migrations.display())?;
        writeln!(f, "config = {}", self.config.display())?;
        writeln!(f, "pid = {}", self.pid.display())?;
        write!(f, "logs = {}", self.logs.display())
    }
}
