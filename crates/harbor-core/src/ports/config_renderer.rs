//! Configuration renderer port.
//!
//! Producing configuration text is an external concern. The core only
//! decides when to render and where the result is persisted.

use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

/// Everything a renderer may substitute into the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    /// Environment being rendered.
    pub environment: String,
    /// Template source file.
    pub template: PathBuf,
    /// Named values, keyed by upper-case name.
    pub vars: BTreeMap<String, String>,
}

impl RenderContext {
    pub fn new(environment: impl Into<String>, template: impl Into<PathBuf>) -> Self {
        Self {
            environment: environment.into(),
            template: template.into(),
            vars: BTreeMap::new(),
        }
    }

    /// Add or replace a variable. Names are stored upper-cased.
    #[must_use]
    pub fn with_var(mut self, name: &str, value: impl ToString) -> Self {
        self.vars.insert(name.to_ascii_uppercase(), value.to_string());
        self
    }

    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }
}

/// Errors a renderer can report.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot read template {}: {source}", .path.display())]
    Template {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("template references unknown variable '{0}'")]
    UnknownVariable(String),

    #[error("unterminated placeholder at byte {0}")]
    Unterminated(usize),
}

/// Renders configuration text for an environment.
pub trait ConfigRenderer: Send + Sync {
    fn render(&self, ctx: &RenderContext) -> Result<String, RenderError>;
}
