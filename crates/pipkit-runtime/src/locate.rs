//! Executable lookup for the Python interpreter and pip.
//!
//! Resolution order:
//! 1. An explicit configured path that exists on disk (authoritative)
//! 2. Otherwise the platform's candidate names, first hit on the search path wins
//!
//! The search path is the `PATH` of the configuration's environment overlay
//! when it has one, so an activated virtual environment takes precedence.
//! Nothing is cached; every operation re-resolves.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use pipkit_core::{ClassifiedError, ExecutableRef, OsFamily, PipConfig};
use thiserror::Error;
use tracing::{debug, warn};

// ============================================================================
// Candidates
// ============================================================================

const RUNTIME_CANDIDATES_WINDOWS: &[&str] = &["py", "python3", "python"];
const RUNTIME_CANDIDATES_UNIX: &[&str] = &["python3", "python", "python2"];

const TOOL_CANDIDATES_WINDOWS: &[&str] = &["pip", "pip3", "py -m pip", "python -m pip"];
const TOOL_CANDIDATES_UNIX: &[&str] = &["pip3", "pip", "python3 -m pip", "python -m pip"];

// ============================================================================
// Error Types
// ============================================================================

/// Executable lookup failures.
#[derive(Debug, Error)]
pub enum LocateError {
    #[error("{what} not found (tried: {})", tried.join(", "))]
    NotFound {
        what: &'static str,
        tried: Vec<String>,
    },
}

impl LocateError {
    pub fn tried(&self) -> &[String] {
        match self {
            Self::NotFound { tried, .. } => tried,
        }
    }

    /// Engine error for a missing pip.
    pub fn into_tool_error(self) -> ClassifiedError {
        ClassifiedError::tool_not_installed(self.tried())
    }

    /// Engine error for a missing interpreter.
    pub fn into_runtime_error(self) -> ClassifiedError {
        ClassifiedError::runtime_not_found(self.tried())
    }
}

// ============================================================================
// Locator
// ============================================================================

/// Resolves the interpreter and pip for a configuration snapshot.
#[derive(Debug, Clone, Copy)]
pub struct Locator {
    os: OsFamily,
}

impl Default for Locator {
    fn default() -> Self {
        Self::for_os(OsFamily::current())
    }
}

impl Locator {
    /// Locator using the candidate lists of `os`.
    pub const fn for_os(os: OsFamily) -> Self {
        Self { os }
    }

    pub const fn os(&self) -> OsFamily {
        self.os
    }

    pub const fn runtime_candidates(&self) -> &'static [&'static str] {
        if self.os.is_windows() {
            RUNTIME_CANDIDATES_WINDOWS
        } else {
            RUNTIME_CANDIDATES_UNIX
        }
    }

    pub const fn tool_candidates(&self) -> &'static [&'static str] {
        if self.os.is_windows() {
            TOOL_CANDIDATES_WINDOWS
        } else {
            TOOL_CANDIDATES_UNIX
        }
    }

    /// Resolve the Python interpreter.
    pub fn resolve_runtime(&self, config: &PipConfig) -> Result<ExecutableRef, LocateError> {
        let explicit = config
            .python_path
            .as_ref()
            .map(|path| ExecutableRef::program(path.clone()));
        self.resolve("Python interpreter", explicit, self.runtime_candidates(), config)
    }

    /// Resolve pip, either as its own executable or as `<python> -m pip`.
    pub fn resolve_tool(&self, config: &PipConfig) -> Result<ExecutableRef, LocateError> {
        let explicit = config.pip_path.as_deref().and_then(ExecutableRef::parse);
        self.resolve("pip", explicit, self.tool_candidates(), config)
    }

    fn resolve(
        &self,
        what: &'static str,
        explicit: Option<ExecutableRef>,
        candidates: &[&str],
        config: &PipConfig,
    ) -> Result<ExecutableRef, LocateError> {
        let search_path = search_path(config);

        if let Some(exe) = explicit {
            if exe.program_path().is_file() {
                debug!("Using configured {what}: {exe}");
                return Ok(exe);
            }
            if let Some(found) = find_program(exe.program_path(), search_path.as_ref()) {
                debug!("Using configured {what} from search path: {}", found.display());
                return Ok(exe.with_program(found));
            }
            warn!("Configured {what} does not exist: {exe}, falling back to candidate search");
        }

        for candidate in candidates {
            let Some(exe) = ExecutableRef::parse(candidate) else {
                continue;
            };
            if let Some(found) = find_program(exe.program_path(), search_path.as_ref()) {
                let resolved = exe.with_program(found);
                debug!("Resolved {what}: {resolved}");
                return Ok(resolved);
            }
        }

        Err(LocateError::NotFound {
            what,
            tried: candidates.iter().map(ToString::to_string).collect(),
        })
    }
}

/// Search path for a configuration: the overlay `PATH` first, then the process `PATH`.
pub fn search_path(config: &PipConfig) -> Option<OsString> {
    config
        .environment
        .get("PATH")
        .map(OsString::from)
        .or_else(|| std::env::var_os("PATH"))
}

/// Find a program on `search_path`. Absolute and relative paths are only
/// checked for existence.
pub fn find_program(program: &Path, search_path: Option<&OsString>) -> Option<PathBuf> {
    if program.components().count() > 1 {
        return program.is_file().then(|| program.to_path_buf());
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    which::which_in(program, search_path, cwd).ok()
}

/// Look up a bare command name against a configuration's search path.
pub fn find_command(name: &str, config: &PipConfig) -> Option<PathBuf> {
    find_program(Path::new(name), search_path(config).as_ref())
}
