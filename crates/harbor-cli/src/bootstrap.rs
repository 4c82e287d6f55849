//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the CLI adapter. All concrete implementations are instantiated here:
//! - Settings and project layout (via harbor-core)
//! - Binary locator, config coordinator and process controller (via harbor-runtime)
//! - Control-endpoint connector and migration source (via harbor-runtime)
//!
//! Command handlers receive the fully-composed [`CliContext`].

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use harbor_core::settings::is_valid_environment_name;
use harbor_core::{
    EnvironmentResolver, MigrationSource, ProjectLayout, ProjectSettings, ServerControl,
    SessionBridge,
};
use harbor_runtime::{
    BINARY_ENV_VAR, BinaryLocator, ConfigCoordinator, FsMigrationSource, HttpConnector,
    LoggedControl, PlaceholderRenderer, ProcessController,
};
use tracing_subscriber::EnvFilter;

use crate::error::CliError;
use crate::parser::GlobalFlags;

/// Environment variable naming the default environment.
pub const ENVIRONMENT_ENV_VAR: &str = "HARBOR_ENV";

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins; otherwise `--verbose` selects `debug` and the default
/// is `warn`.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Project root directory.
    pub project_root: PathBuf,
    /// Value of `HARBOR_ENV`, if set.
    pub env_override: Option<String>,
    /// Value of `HARBOR_SERVER_BIN`, if set.
    pub binary_override: Option<PathBuf>,
    /// Keep full remote stack traces.
    pub trace: bool,
}

impl CliConfig {
    /// Build the configuration from global flags and the process environment.
    pub fn from_flags(flags: &GlobalFlags) -> Result<Self> {
        let project_root = match &flags.project {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };
        Ok(Self {
            project_root,
            env_override: std::env::var(ENVIRONMENT_ENV_VAR).ok(),
            binary_override: std::env::var_os(BINARY_ENV_VAR).map(PathBuf::from),
            trace: flags.trace,
        })
    }
}

/// Fully composed context for CLI commands.
pub struct CliContext {
    pub layout: ProjectLayout,
    pub settings: Arc<ProjectSettings>,
    pub environments: EnvironmentResolver,
    /// Process controller for direct server operations.
    pub control: Arc<dyn ServerControl>,
    /// Runs code and migrations inside a server.
    pub bridge: SessionBridge,
    pub migrations: Arc<dyn MigrationSource>,
    pub trace: bool,
}

impl CliContext {
    /// Environment to act on: `explicit` when given, else the default.
    pub fn environment<'a>(&'a self, explicit: Option<&'a str>) -> Result<&'a str, CliError> {
        let environment = self.environments.resolve(explicit);
        if is_valid_environment_name(environment) {
            Ok(environment)
        } else {
            Err(CliError::Arguments(format!(
                "'{environment}' is not a valid environment name"
            )))
        }
    }
}

/// Resolve the server binary override.
///
/// The settings file wins over `HARBOR_SERVER_BIN`. Paths with a directory
/// part are relative to the project root; bare names are looked up on `PATH`.
fn binary_override(
    layout: &ProjectLayout,
    settings: &ProjectSettings,
    from_env: Option<PathBuf>,
) -> Option<PathBuf> {
    match &settings.server_binary {
        Some(path) if path.components().count() > 1 => Some(layout.resolve(path)),
        Some(name) => Some(name.clone()),
        None => from_env.filter(|p| !p.as_os_str().is_empty()),
    }
}

/// Bootstrap the CLI application.
///
/// This is the composition root. It:
/// 1. Loads and parses `harbor.json`
/// 2. Creates the binary locator and config coordinator
/// 3. Creates the process controller, wrapped in the logging decorator
/// 4. Creates the session bridge over the HTTP connector
pub fn bootstrap(config: CliConfig) -> Result<CliContext> {
    let layout = ProjectLayout::new(config.project_root);
    let settings = ProjectSettings::load(&layout.settings_path())
        .map_err(|e| CliError::Config(e.to_string()))?;
    let settings = Arc::new(settings);

    let locator = Arc::new(BinaryLocator::new(binary_override(
        &layout,
        &settings,
        config.binary_override,
    )));
    let coordinator = ConfigCoordinator::new(
        layout.clone(),
        Arc::clone(&settings),
        Arc::new(PlaceholderRenderer),
    );
    let controller =
        ProcessController::new(layout.clone(), Arc::clone(&settings), locator, coordinator);
    let control: Arc<dyn ServerControl> = Arc::new(LoggedControl::new(controller));

    let bridge = SessionBridge::new(Arc::clone(&control), Arc::new(HttpConnector::default()));
    let migrations = Arc::new(FsMigrationSource::new(layout.migrations_dir()));
    let environments = EnvironmentResolver::new(&layout, config.env_override);

    tracing::debug!(root = %layout.root().display(), "CLI context ready");

    Ok(CliContext {
        layout,
        settings,
        environments,
        control,
        bridge,
        migrations,
        trace: config.trace,
    })
}
