//! Render-then-persist for one environment's configuration.

use std::path::PathBuf;
use std::sync::Arc;

use harbor_core::{
    ConfigRenderer, EnvironmentSettings, HarborError, ProjectLayout, ProjectSettings,
    RenderContext,
};
use tracing::{debug, info};

use super::atomic::write_atomic;

/// Produces the configuration file a server is started with.
#[derive(Clone)]
pub struct ConfigCoordinator {
    layout: ProjectLayout,
    settings: Arc<ProjectSettings>,
    renderer: Arc<dyn ConfigRenderer>,
}

impl ConfigCoordinator {
    pub fn new(
        layout: ProjectLayout,
        settings: Arc<ProjectSettings>,
        renderer: Arc<dyn ConfigRenderer>,
    ) -> Self {
        Self {
            layout,
            settings,
            renderer,
        }
    }

    /// Variables available to the template.
    ///
    /// User-defined `vars` come first; the built-in names always win so the
    /// server writes its PID record where the controller looks for it.
    pub fn render_context(&self, env: &EnvironmentSettings) -> RenderContext {
        let name = env.name.as_str();
        let mut ctx = RenderContext::new(name, self.layout.resolve(&env.template));
        for (key, value) in &env.vars {
            ctx = ctx.with_var(key, value);
        }

        ctx.with_var("ENVIRONMENT", name)
            .with_var("PORT", env.port)
            .with_var("CONTROL_PORT", env.control_port)
            .with_var("NUM_WORKERS", env.num_workers)
            .with_var("PID_PATH", self.layout.pid_path(name).display())
            .with_var("LOGS_DIR", self.layout.logs_dir(name).display())
            .with_var("PREFIX", self.layout.state_dir(name).display())
    }

    /// Render and atomically write the configuration for `environment`.
    ///
    /// Returns the written path. The previous file survives any failure.
    pub fn ensure_config(&self, environment: &str) -> Result<PathBuf, HarborError> {
        let env = self.settings.for_environment(environment)?;
        let path = self.layout.config_path(environment);
        let failure = |reason: String| HarborError::ConfigWriteFailure {
            path: path.clone(),
            reason,
        };

        let ctx = self.render_context(&env);
        debug!(
            environment,
            template = %ctx.template.display(),
            vars = ctx.vars.len(),
            "Rendering configuration"
        );
        let text = self
            .renderer
            .render(&ctx)
            .map_err(|e| failure(e.to_string()))?;

        std::fs::create_dir_all(self.layout.logs_dir(environment))
            .map_err(|e| failure(e.to_string()))?;
        write_atomic(&path, text.as_bytes()).map_err(|e| failure(e.to_string()))?;

        info!(environment, path = %path.display(), "Configuration written");
        Ok(path)
    }
}
