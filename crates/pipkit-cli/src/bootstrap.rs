//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where the engine is wired together for the
//! CLI adapter:
//! - Configuration (file, then `PIPKIT_*` variables, then global flags)
//! - Virtual environment activation for `--venv`
//! - The process-backed [`PipManager`]
//! - The cancellation token shared with the Ctrl-C handler
//!
//! Command handlers receive the composed [`CliContext`].

use std::path::PathBuf;
use std::time::Duration;

use pipkit_core::{ExecContext, PipConfig};
use pipkit_runtime::PipManager;
use tracing::debug;

use crate::error::CliError;
use crate::parser::Cli;

/// Bootstrap configuration for the CLI, taken from the global flags.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// JSON configuration file.
    pub config_file: Option<PathBuf>,
    /// Interpreter override.
    pub python: Option<PathBuf>,
    /// pip command override.
    pub pip: Option<String>,
    /// Per-command timeout override.
    pub timeout: Option<Duration>,
    /// Virtual environment to activate.
    pub venv: Option<PathBuf>,
}

impl CliConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            config_file: cli.config.clone(),
            python: cli.python.clone(),
            pip: cli.pip.clone(),
            timeout: cli.timeout.map(Duration::from_secs),
            venv: cli.venv.clone(),
        }
    }

    /// Build the engine configuration snapshot.
    ///
    /// `lookup` reads environment variables; it is a parameter so tests
    /// never touch the process environment.
    pub fn resolve(&self, lookup: impl Fn(&str) -> Option<String>) -> Result<PipConfig, CliError> {
        let base = match &self.config_file {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                PipConfig::load(path)?
            }
            None => PipConfig::default(),
        };
        let mut config = base.with_overrides_from(&lookup)?;

        if let Some(python) = &self.python {
            config.python_path = Some(python.clone());
        }
        if let Some(pip) = &self.pip {
            config.pip_path = Some(pip.clone());
        }
        if let Some(timeout) = self.timeout {
            config.command_timeout = timeout;
        }
        config.validate()?;

        if let Some(venv) = &self.venv {
            config = config.activated(venv, lookup("PATH").as_deref())?;
            debug!("Activated virtual environment {}", venv.display());
        }
        Ok(config)
    }
}

/// Fully composed context for CLI commands.
pub struct CliContext {
    /// The pip operation surface.
    pub manager: PipManager,
    /// Configuration snapshot for this invocation.
    pub config: PipConfig,
    /// Cancellation shared with the Ctrl-C handler.
    pub exec: ExecContext,
}

impl CliContext {
    pub const fn manager(&self) -> &PipManager {
        &self.manager
    }
}

/// Compose the CLI context from its configuration.
pub fn bootstrap(config: &CliConfig) -> Result<CliContext, CliError> {
    let pip_config = config.resolve(|key| std::env::var(key).ok())?;
    Ok(CliContext {
        manager: PipManager::default(),
        config: pip_config,
        exec: ExecContext::new(),
    })
}
