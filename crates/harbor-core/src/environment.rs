//! Environment selection.
//!
//! An explicit environment argument always wins. Otherwise the process-wide
//! default is resolved once per invocation and cached:
//!
//! 1. `HARBOR_ENV` (passed in by the caller)
//! 2. First line of `<project>/harbor_environment`
//! 3. [`DEFAULT_ENVIRONMENT`]

use std::path::PathBuf;
use std::sync::OnceLock;

use crate::paths::ProjectLayout;

/// Environment used when nothing else names one.
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Resolves the environment for one CLI invocation.
#[derive(Debug)]
pub struct EnvironmentResolver {
    env_override: Option<String>,
    environment_file: PathBuf,
    default: OnceLock<String>,
}

impl EnvironmentResolver {
    /// Create a resolver for `layout`.
    ///
    /// `env_override` is the value of `HARBOR_ENV`, read by the caller.
    pub fn new(layout: &ProjectLayout, env_override: Option<String>) -> Self {
        Self {
            env_override,
            environment_file: layout.environment_file(),
            default: OnceLock::new(),
        }
    }

    /// The environment to act on.
    pub fn resolve<'a>(&'a self, explicit: Option<&'a str>) -> &'a str {
        match explicit.map(str::trim).filter(|e| !e.is_empty()) {
            Some(environment) => environment,
            None => self.default_environment(),
        }
    }

    /// The cached process-wide default.
    pub fn default_environment(&self) -> &str {
        self.default.get_or_init(|| {
            let resolved = self
                .env_override
                .as_deref()
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(str::to_string)
                .or_else(|| self.read_environment_file())
                .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());
            tracing::debug!(environment = %resolved, "Resolved default environment");
            resolved
        })
    }

    fn read_environment_file(&self) -> Option<String> {
        let content = std::fs::read_to_string(&self.environment_file).ok()?;
        content
            .lines()
            .next()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
    }
}
