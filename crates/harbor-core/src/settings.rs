//! Project settings and validation.
//!
//! Settings live in `harbor.json` at the project root:
//!
//! ```json
//! {
//!   "server_binary": "/usr/local/openresty/nginx/sbin/nginx",
//!   "defaults": { "port": 8080, "vars": { "CODE_CACHE": "off" } },
//!   "environments": {
//!     "production": { "port": 80, "num_workers": 4, "vars": { "CODE_CACHE": "on" } }
//!   }
//! }
//! ```
//!
//! Every environment inherits `defaults` and overrides individual fields.
//! Unknown keys are rejected so a typo never silently falls back to a default.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default HTTP port of the server.
pub const DEFAULT_PORT: u16 = 8080;

/// Default loopback port of the control endpoint.
pub const DEFAULT_CONTROL_PORT: u16 = 8181;

/// Default time to wait for a started server's PID record.
pub const DEFAULT_STARTUP_TIMEOUT_SECS: u64 = 10;

/// Upper bound on `startup_timeout_secs`.
pub const MAX_STARTUP_TIMEOUT_SECS: u64 = 3600;

/// Default configuration template, relative to the project root.
pub const DEFAULT_TEMPLATE: &str = "server.conf";

/// Launch arguments used when none are configured.
pub const DEFAULT_LAUNCH_ARGS: [&str; 4] = ["-p", "{prefix}", "-c", "{config}"];

/// Per-environment overrides as written in `harbor.json`.
///
/// All fields are optional; unset fields fall back to `defaults`, then to
/// the built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct EnvironmentOverrides {
    pub port: Option<u16>,
    pub control_port: Option<u16>,
    pub num_workers: Option<u32>,
    pub startup_timeout_secs: Option<u64>,
    pub template: Option<PathBuf>,
    pub launch_args: Option<Vec<String>>,
    pub vars: BTreeMap<String, String>,
}

impl EnvironmentOverrides {
    /// Layer `other` on top of `self`; `other` wins field by field and its
    /// vars are merged over ours.
    fn layered(&self, other: &Self) -> Self {
        let mut vars = self.vars.clone();
        vars.extend(other.vars.iter().map(|(k, v)| (k.clone(), v.clone())));
        Self {
            port: other.port.or(self.port),
            control_port: other.control_port.or(self.control_port),
            num_workers: other.num_workers.or(self.num_workers),
            startup_timeout_secs: other.startup_timeout_secs.or(self.startup_timeout_secs),
            template: other.template.clone().or_else(|| self.template.clone()),
            launch_args: other
                .launch_args
                .clone()
                .or_else(|| self.launch_args.clone()),
            vars,
        }
    }
}

/// Contents of `harbor.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectSettings {
    /// Server executable, bypassing the well-known search locations.
    pub server_binary: Option<PathBuf>,
    pub defaults: EnvironmentOverrides,
    pub environments: BTreeMap<String, EnvironmentOverrides>,
}

/// Fully resolved settings for one environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentSettings {
    pub name: String,
    pub port: u16,
    pub control_port: u16,
    pub num_workers: u32,
    pub startup_timeout_secs: u64,
    /// Template path, relative to the project root unless absolute.
    pub template: PathBuf,
    pub launch_args: Vec<String>,
    pub vars: BTreeMap<String, String>,
}

impl ProjectSettings {
    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No settings file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(SettingsError::Read {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        };
        Self::parse(&content)
    }

    /// Parse settings from JSON text.
    pub fn parse(content: &str) -> Result<Self, SettingsError> {
        serde_json::from_str(content).map_err(|e| SettingsError::Parse(e.to_string()))
    }

    /// Resolve and validate the settings for `environment`.
    ///
    /// An environment without its own section uses `defaults` unchanged.
    pub fn for_environment(&self, environment: &str) -> Result<EnvironmentSettings, SettingsError> {
        let merged = match self.environments.get(environment) {
            Some(overrides) => self.defaults.layered(overrides),
            None => self.defaults.clone(),
        };

        let settings = EnvironmentSettings {
            name: environment.to_string(),
            port: merged.port.unwrap_or(DEFAULT_PORT),
            control_port: merged.control_port.unwrap_or(DEFAULT_CONTROL_PORT),
            num_workers: merged.num_workers.unwrap_or(1),
            startup_timeout_secs: merged
                .startup_timeout_secs
                .unwrap_or(DEFAULT_STARTUP_TIMEOUT_SECS),
            template: merged
                .template
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATE)),
            launch_args: merged.launch_args.unwrap_or_else(|| {
                DEFAULT_LAUNCH_ARGS.iter().map(|s| (*s).to_string()).collect()
            }),
            vars: merged.vars,
        };

        validate_settings(&settings)?;
        Ok(settings)
    }
}

/// Settings validation error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SettingsError {
    #[error("Cannot read settings file {}: {reason}", .path.display())]
    Read { path: PathBuf, reason: String },

    #[error("Invalid settings file: {0}")]
    Parse(String),

    #[error("Port must be non-zero")]
    ZeroPort,

    #[error("Control port must differ from the server port ({0})")]
    PortClash(u16),

    #[error("num_workers must be at least 1")]
    NoWorkers,

    #[error("startup_timeout_secs must be at least 1")]
    ZeroTimeout,

    #[error("startup_timeout_secs must be at most {max}, got {0}", max = MAX_STARTUP_TIMEOUT_SECS)]
    TimeoutTooLong(u64),

    #[error("launch_args entries cannot be empty")]
    EmptyLaunchArg,

    #[error("Environment name '{0}' is invalid")]
    InvalidEnvironment(String),
}

/// Validate resolved environment settings.
pub fn validate_settings(settings: &EnvironmentSettings) -> Result<(), SettingsError> {
    if !is_valid_environment_name(&settings.name) {
        return Err(SettingsError::InvalidEnvironment(settings.name.clone()));
    }

    if settings.port == 0 || settings.control_port == 0 {
        return Err(SettingsError::ZeroPort);
    }

    if settings.port == settings.control_port {
        return Err(SettingsError::PortClash(settings.port));
    }

    if settings.num_workers == 0 {
        return Err(SettingsError::NoWorkers);
    }

    if settings.startup_timeout_secs == 0 {
        return Err(SettingsError::ZeroTimeout);
    }

    if settings.startup_timeout_secs > MAX_STARTUP_TIMEOUT_SECS {
        return Err(SettingsError::TimeoutTooLong(settings.startup_timeout_secs));
    }

    if settings.launch_args.iter().any(|a| a.trim().is_empty()) {
        return Err(SettingsError::EmptyLaunchArg);
    }

    Ok(())
}

/// Environment names become directory names, so keep them to a safe set.
pub fn is_valid_environment_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
