//! Caller-owned configuration snapshot.
//!
//! A [`PipConfig`] is threaded explicitly through every engine call. The
//! engine only reads it; activating or deactivating a virtual environment
//! produces a *new* snapshot instead of mutating shared state.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{ClassifiedError, ErrorKind};

/// Default URL of the pip bootstrap script.
pub const DEFAULT_BOOTSTRAP_URL: &str = "https://bootstrap.pypa.io/get-pip.py";

/// Default timeout for a single pip invocation.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(900);

/// Default client-side timeout for network operations.
pub const DEFAULT_NETWORK_TIMEOUT: Duration = Duration::from_secs(15);

/// Default retry count handed to pip's `--retries`.
pub const DEFAULT_RETRIES: u32 = 5;

const ENV_PYTHON: &str = "PIPKIT_PYTHON";
const ENV_PIP: &str = "PIPKIT_PIP";
const ENV_TIMEOUT: &str = "PIPKIT_TIMEOUT";
const ENV_NETWORK_TIMEOUT: &str = "PIPKIT_NETWORK_TIMEOUT";
const ENV_INDEX_URL: &str = "PIPKIT_INDEX_URL";

/// Marker file that identifies a virtual environment root.
pub const VENV_MARKER: &str = "pyvenv.cfg";

/// Configuration validation and loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Failed to parse config file {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

impl From<ConfigError> for ClassifiedError {
    fn from(err: ConfigError) -> Self {
        let kind = match err {
            ConfigError::Read { .. } => ErrorKind::FileNotFound,
            _ => ErrorKind::InvalidConfiguration,
        };
        Self::new(kind, err.to_string()).with_cause(err)
    }
}

/// Engine configuration.
///
/// All fields have defaults, so a partial JSON file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipConfig {
    /// Explicit Python interpreter. Wins over the candidate search when it exists.
    pub python_path: Option<PathBuf>,

    /// Explicit pip invocation, either a path or a template like `python3 -m pip`.
    pub pip_path: Option<String>,

    /// Deadline for a single pip invocation.
    #[serde(with = "duration_secs")]
    pub command_timeout: Duration,

    /// Client-side timeout for downloads and pip's own `--timeout`.
    #[serde(with = "duration_secs")]
    pub network_timeout: Duration,

    /// Passed through to pip's `--retries`.
    pub retries: u32,

    /// Environment overlay applied to every child process.
    pub environment: BTreeMap<String, String>,

    /// Package index for operations that contact one (`install`, `download`,
    /// `list --outdated`). Commands that only read the environment never get it.
    pub index_url: Option<String>,

    /// Extra option pairs appended verbatim to every pip invocation.
    /// A `None` value emits the bare flag.
    pub extra_options: Vec<(String, Option<String>)>,

    /// Where the remote bootstrap strategy downloads `get-pip.py` from.
    pub bootstrap_url: String,

    /// Allow the remote bootstrap strategy.
    pub allow_network_bootstrap: bool,

    /// Prefix OS package manager commands with `sudo -n` when available.
    pub use_sudo: bool,

    /// Root of the activated virtual environment, if any.
    pub active_environment: Option<PathBuf>,
}

impl Default for PipConfig {
    fn default() -> Self {
        Self {
            python_path: None,
            pip_path: None,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            network_timeout: DEFAULT_NETWORK_TIMEOUT,
            retries: DEFAULT_RETRIES,
            environment: BTreeMap::new(),
            index_url: None,
            extra_options: Vec::new(),
            bootstrap_url: DEFAULT_BOOTSTRAP_URL.to_string(),
            allow_network_bootstrap: true,
            use_sudo: true,
            active_environment: None,
        }
    }
}

impl PipConfig {
    /// Load a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Apply `PIPKIT_*` variables from the process environment.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply `PIPKIT_*` overrides from an arbitrary lookup.
    pub fn with_overrides_from(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(python) = lookup(ENV_PYTHON).filter(|v| !v.is_empty()) {
            self.python_path = Some(PathBuf::from(python));
        }
        if let Some(pip) = lookup(ENV_PIP).filter(|v| !v.is_empty()) {
            self.pip_path = Some(pip);
        }
        if let Some(secs) = lookup(ENV_TIMEOUT) {
            self.command_timeout = parse_secs(ENV_TIMEOUT, &secs)?;
        }
        if let Some(secs) = lookup(ENV_NETWORK_TIMEOUT) {
            self.network_timeout = parse_secs(ENV_NETWORK_TIMEOUT, &secs)?;
        }
        if let Some(url) = lookup(ENV_INDEX_URL).filter(|v| !v.is_empty()) {
            self.index_url = Some(url);
        }
        Ok(self)
    }

    /// Check invariants the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.command_timeout.is_zero() {
            return Err(invalid("command_timeout", "must be greater than zero"));
        }
        if self.network_timeout.is_zero() {
            return Err(invalid("network_timeout", "must be greater than zero"));
        }
        if let Some(pip) = &self.pip_path {
            if pip.trim().is_empty() {
                return Err(invalid("pip_path", "must not be blank"));
            }
        }
        if self.index_url.as_ref().is_some_and(|url| url.trim().is_empty()) {
            return Err(invalid("index_url", "must not be blank"));
        }
        if self.allow_network_bootstrap
            && !(self.bootstrap_url.starts_with("https://")
                || self.bootstrap_url.starts_with("http://"))
        {
            return Err(invalid("bootstrap_url", "must be an http(s) URL"));
        }
        if let Some((key, _)) = self
            .extra_options
            .iter()
            .find(|(key, _)| !key.starts_with('-'))
        {
            return Err(invalid(
                "extra_options",
                &format!("option '{key}' must start with '-'"),
            ));
        }
        if self.environment.keys().any(|k| k.is_empty() || k.contains('=')) {
            return Err(invalid("environment", "keys must be non-empty and contain no '='"));
        }
        Ok(())
    }

    /// Return a snapshot with the virtual environment at `root` activated.
    ///
    /// The overlay gains `VIRTUAL_ENV` and a `PATH` with the environment's
    /// script directory first, so the next resolution picks its interpreter.
    /// `base_path` is the `PATH` to extend when the overlay has none.
    pub fn activated(&self, root: &Path, base_path: Option<&str>) -> Result<Self, ClassifiedError> {
        if !root.join(VENV_MARKER).is_file() {
            return Err(ClassifiedError::new(
                ErrorKind::EnvironmentNotFound,
                format!("No virtual environment found at {}", root.display()),
            )
            .with_context("path", root.display().to_string())
            .with_suggestion("Create it first with `pipkit venv <path>`"));
        }

        let mut next = self.deactivated();
        let scripts = venv_scripts_dir(root);
        let inherited = next
            .environment
            .get("PATH")
            .cloned()
            .or_else(|| base_path.map(str::to_string))
            .unwrap_or_default();
        let entries = std::iter::once(scripts)
            .chain(std::env::split_paths(&inherited).filter(|p| !p.as_os_str().is_empty()));
        let path = std::env::join_paths(entries).map_err(|e| {
            ClassifiedError::new(
                ErrorKind::InvalidPath,
                format!("Cannot put {} on PATH: {e}", root.display()),
            )
            .with_context("path", root.display().to_string())
        })?;

        next.environment
            .insert("PATH".to_string(), path.to_string_lossy().into_owned());
        next.environment
            .insert("VIRTUAL_ENV".to_string(), root.display().to_string());
        next.active_environment = Some(root.to_path_buf());
        Ok(next)
    }

    /// Return a snapshot with any activated environment removed from the overlay.
    #[must_use]
    pub fn deactivated(&self) -> Self {
        let mut next = self.clone();
        let Some(root) = next.active_environment.take() else {
            return next;
        };

        next.environment.remove("VIRTUAL_ENV");
        let scripts = venv_scripts_dir(&root);
        if let Some(path) = next.environment.remove("PATH") {
            let rest: Vec<PathBuf> = std::env::split_paths(&path)
                .filter(|entry| !entry.as_os_str().is_empty() && *entry != scripts)
                .collect();
            // entries came out of split_paths, so they always join back
            if let Ok(joined) = std::env::join_paths(&rest) {
                if !joined.is_empty() {
                    next.environment
                        .insert("PATH".to_string(), joined.to_string_lossy().into_owned());
                }
            }
        }
        next
    }

    /// Flatten `extra_options` into argv tokens.
    pub fn extra_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.extra_options.len() * 2);
        for (key, value) in &self.extra_options {
            args.push(key.clone());
            if let Some(value) = value {
                args.push(value.clone());
            }
        }
        args
    }
}

/// Directory holding the interpreter and scripts inside a virtual environment.
pub fn venv_scripts_dir(root: &Path) -> PathBuf {
    if cfg!(windows) {
        root.join("Scripts")
    } else {
        root.join("bin")
    }
}

fn parse_secs(key: &str, raw: &str) -> Result<Duration, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| invalid(key, &e.to_string()))
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
