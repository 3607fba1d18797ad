//! Classified error type returned at the engine boundary.
//!
//! Every failure that leaves pipkit is a [`ClassifiedError`]: a value tagged
//! with an [`ErrorKind`] from a closed taxonomy plus a structured payload
//! (command line, captured output, exit code, suggestions, context).
//! Rendering is a pure projection of that payload.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of characters of captured output kept for display.
pub const OUTPUT_DISPLAY_LIMIT: usize = 2000;

/// Closed taxonomy of failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    /// pip itself could not be found or invoked.
    ToolNotInstalled,
    /// No Python interpreter could be found.
    RuntimeNotFound,
    /// The requested package does not exist (locally or on the index).
    PackageNotFound,
    /// The referenced virtual environment does not exist.
    EnvironmentNotFound,
    /// A virtual environment already exists at the target path.
    EnvironmentAlreadyExists,
    /// A requirement specifier was empty or rejected by pip.
    InvalidSpecification,
    /// Generic non-zero exit.
    CommandFailed,
    /// The OS refused access.
    PermissionDenied,
    /// Index or download unreachable.
    NetworkError,
    /// No installation strategy exists for this OS.
    UnsupportedPlatform,
    /// A referenced file does not exist.
    FileNotFound,
    /// A referenced path is not usable for the operation.
    InvalidPath,
    /// The operation is disabled by configuration or by the interpreter build.
    FeatureDisabled,
    /// Deadline exceeded or the operation was cancelled.
    Timeout,
    /// Configuration failed validation.
    InvalidConfiguration,
}

impl ErrorKind {
    /// Stable kebab-case identifier.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ToolNotInstalled => "tool-not-installed",
            Self::RuntimeNotFound => "runtime-not-found",
            Self::PackageNotFound => "package-not-found",
            Self::EnvironmentNotFound => "environment-not-found",
            Self::EnvironmentAlreadyExists => "environment-already-exists",
            Self::InvalidSpecification => "invalid-specification",
            Self::CommandFailed => "command-failed",
            Self::PermissionDenied => "permission-denied",
            Self::NetworkError => "network-error",
            Self::UnsupportedPlatform => "unsupported-platform",
            Self::FileNotFound => "file-not-found",
            Self::InvalidPath => "invalid-path",
            Self::FeatureDisabled => "feature-disabled",
            Self::Timeout => "timeout",
            Self::InvalidConfiguration => "invalid-configuration",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A taxonomy-tagged failure with remediation suggestions.
///
/// Constructed once at the failure site with the builder methods, enriched
/// by the [`ErrorClassifier`](crate::classify::ErrorClassifier), then handed
/// to the caller.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ClassifiedError {
    kind: ErrorKind,
    message: String,
    command: Option<String>,
    output: Option<String>,
    exit_code: Option<i32>,
    suggestions: Vec<String>,
    context: BTreeMap<String, String>,
    #[source]
    cause: Option<Cause>,
}

impl ClassifiedError {
    /// Create an error of the given kind with a human message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            command: None,
            output: None,
            exit_code: None,
            suggestions: Vec::new(),
            context: BTreeMap::new(),
            cause: None,
        }
    }

    /// pip could not be located.
    pub fn tool_not_installed(tried: &[String]) -> Self {
        Self::new(
            ErrorKind::ToolNotInstalled,
            "pip is not installed or not on PATH",
        )
        .with_context("tried", tried.join(", "))
        .with_suggestion("Run `pipkit bootstrap` to install pip")
        .with_suggestion("Set an explicit pip path in the configuration")
    }

    /// No Python interpreter could be located.
    pub fn runtime_not_found(tried: &[String]) -> Self {
        Self::new(
            ErrorKind::RuntimeNotFound,
            "No Python interpreter found on PATH",
        )
        .with_context("tried", tried.join(", "))
        .with_suggestion("Install Python 3 from https://www.python.org/downloads/")
        .with_suggestion("Set an explicit interpreter path in the configuration")
    }

    /// Replace the kind. Only used while the error is still being built.
    #[must_use]
    pub const fn with_kind(mut self, kind: ErrorKind) -> Self {
        self.kind = kind;
        self
    }

    /// Attach the failing command line.
    #[must_use]
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Attach captured output. Empty output is dropped.
    #[must_use]
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        let output = output.into();
        if !output.trim().is_empty() {
            self.output = Some(output);
        }
        self
    }

    /// Attach the exit code.
    #[must_use]
    pub const fn with_exit_code(mut self, code: i32) -> Self {
        self.exit_code = Some(code);
        self
    }

    /// Append a remediation suggestion, skipping exact duplicates.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        let suggestion = suggestion.into();
        if !self.suggestions.contains(&suggestion) {
            self.suggestions.push(suggestion);
        }
        self
    }

    /// Add a context entry. Later values for the same key replace earlier ones.
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Wrap a lower-level cause.
    #[must_use]
    pub fn with_cause(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }

    /// Full captured output.
    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    /// Captured output cut to [`OUTPUT_DISPLAY_LIMIT`] characters, keeping the tail
    /// where pip prints the actual error.
    pub fn output_excerpt(&self) -> Option<String> {
        let output = self.output.as_deref()?;
        let count = output.chars().count();
        if count <= OUTPUT_DISPLAY_LIMIT {
            return Some(output.to_string());
        }
        let tail: String = output.chars().skip(count - OUTPUT_DISPLAY_LIMIT).collect();
        Some(format!("...{tail}"))
    }

    pub const fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub const fn context(&self) -> &BTreeMap<String, String> {
        &self.context
    }

    /// Multi-line report: kind, message, command, exit code and suggestions.
    pub fn render(&self) -> String {
        let mut out = format!("[{}] {}", self.kind, self.message);
        if let Some(command) = &self.command {
            out.push_str(&format!("\n  command: {command}"));
        }
        if let Some(code) = self.exit_code {
            out.push_str(&format!("\n  exit code: {code}"));
        }
        for suggestion in &self.suggestions {
            out.push_str(&format!("\n  hint: {suggestion}"));
        }
        out
    }
}

/// Result type alias for engine operations.
pub type PipResult<T> = Result<T, ClassifiedError>;
