//! Error classification.
//!
//! Failing command output is matched against an ordered table of known
//! failure signatures. Matches contribute remediation suggestions and, when
//! the structural failure is a plain non-zero exit, a more specific
//! [`ErrorKind`].

use tracing::debug;

use crate::domain::{CommandOutput, LAUNCH_FAILURE_EXIT_CODE};
use crate::error::{ClassifiedError, ErrorKind};
use crate::ports::RunError;

/// A known failure pattern.
///
/// `patterns` are matched case-insensitively as substrings; any one match
/// triggers the signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub name: &'static str,
    pub patterns: &'static [&'static str],
    /// Kind to refine a generic `command-failed` into. `None` only adds hints.
    pub kind: Option<ErrorKind>,
    pub suggestions: &'static [&'static str],
}

impl Signature {
    fn matches(&self, haystack_lower: &str) -> bool {
        self.patterns
            .iter()
            .any(|pattern| haystack_lower.contains(&pattern.to_lowercase()))
    }
}

/// Built-in signatures, most specific first.
pub const DEFAULT_SIGNATURES: &[Signature] = &[
    Signature {
        name: "externally-managed",
        patterns: &["externally-managed-environment", "externally managed"],
        kind: Some(ErrorKind::PermissionDenied),
        suggestions: &[
            "Use an isolated virtual environment (`pipkit venv <path>`) instead of the system interpreter",
            "Install the distribution package from your OS package manager",
        ],
    },
    Signature {
        name: "permission-denied",
        patterns: &["permission denied", "access is denied", "[errno 13]"],
        kind: Some(ErrorKind::PermissionDenied),
        suggestions: &[
            "Re-run with elevated privileges (sudo or an Administrator shell)",
            "Use an isolated virtual environment to avoid touching system packages",
            "Install into the user site with --user",
        ],
    },
    Signature {
        name: "pip-module-missing",
        patterns: &["no module named pip"],
        kind: Some(ErrorKind::ToolNotInstalled),
        suggestions: &["Run `pipkit bootstrap` to install pip for this interpreter"],
    },
    Signature {
        name: "venv-unavailable",
        patterns: &["no module named venv", "ensurepip is not available"],
        kind: Some(ErrorKind::FeatureDisabled),
        suggestions: &[
            "Install the venv package for your Python (e.g. `apt install python3-venv`)",
        ],
    },
    Signature {
        name: "no-matching-distribution",
        patterns: &[
            "could not find a version that satisfies",
            "no matching distribution found",
        ],
        kind: Some(ErrorKind::PackageNotFound),
        suggestions: &[
            "Check the package name and version constraint for typos",
            "Check that the package supports your Python version and platform",
        ],
    },
    Signature {
        name: "package-not-installed",
        patterns: &["package(s) not found", "not installed"],
        kind: Some(ErrorKind::PackageNotFound),
        suggestions: &["Run `pipkit list` to see installed packages"],
    },
    Signature {
        name: "invalid-requirement",
        patterns: &["invalid requirement"],
        kind: Some(ErrorKind::InvalidSpecification),
        suggestions: &["Use a PEP 508 requirement such as `name==1.0` or `name>=1.0`"],
    },
    Signature {
        name: "timeout",
        patterns: &["read timed out", "timed out", "timeout"],
        kind: Some(ErrorKind::Timeout),
        suggestions: &["Raise the network timeout or retry on a faster connection"],
    },
    Signature {
        name: "network",
        patterns: &[
            "connection error",
            "connectionerror",
            "failed to establish a new connection",
            "temporary failure in name resolution",
            "name or service not known",
            "network is unreachable",
            "max retries exceeded",
            "ssl: certificate_verify_failed",
            "proxyerror",
        ],
        kind: Some(ErrorKind::NetworkError),
        suggestions: &[
            "Check your network connection and proxy settings",
            "Point `--index-url` at a reachable mirror",
        ],
    },
    Signature {
        name: "disk-full",
        patterns: &["no space left on device", "disk quota exceeded"],
        kind: None,
        suggestions: &["Free disk space or point TMPDIR at a larger volume"],
    },
    Signature {
        name: "file-not-found",
        patterns: &["no such file or directory", "could not open requirements file"],
        kind: Some(ErrorKind::FileNotFound),
        suggestions: &["Check that the referenced path exists"],
    },
    Signature {
        name: "already-satisfied",
        patterns: &["requirement already satisfied"],
        kind: None,
        suggestions: &[
            "Pass --upgrade to move to a newer version",
            "Pass --force-reinstall to reinstall the installed version",
        ],
    },
    Signature {
        name: "build-failure",
        patterns: &["failed building wheel", "error: subprocess-exited-with-error"],
        kind: None,
        suggestions: &[
            "Install the build toolchain and headers the package needs",
            "Look for a pre-built wheel for your platform",
        ],
    },
];

/// Maps raw failures to [`ClassifiedError`] values.
#[derive(Debug, Clone)]
pub struct ErrorClassifier {
    signatures: Vec<Signature>,
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::with_signatures(DEFAULT_SIGNATURES.to_vec())
    }
}

impl ErrorClassifier {
    /// Classifier using exactly `signatures`, in order.
    pub const fn with_signatures(signatures: Vec<Signature>) -> Self {
        Self { signatures }
    }

    /// Append signatures after the existing ones.
    #[must_use]
    pub fn extended(mut self, signatures: impl IntoIterator<Item = Signature>) -> Self {
        self.signatures.extend(signatures);
        self
    }

    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    /// Classify a failure.
    ///
    /// The structural kind comes from `cause`: launch failures, cancellation
    /// and deadline expiry each have their own kind; no cause means the
    /// process exited non-zero. A program that could not be launched is
    /// reported as [`ErrorKind::ToolNotInstalled`].
    pub fn classify(
        &self,
        command: &str,
        output: &str,
        exit_code: Option<i32>,
        cause: Option<RunError>,
    ) -> ClassifiedError {
        self.classify_with_launch_kind(
            command,
            output,
            exit_code,
            cause,
            ErrorKind::ToolNotInstalled,
        )
    }

    fn classify_with_launch_kind(
        &self,
        command: &str,
        output: &str,
        exit_code: Option<i32>,
        cause: Option<RunError>,
        launch_kind: ErrorKind,
    ) -> ClassifiedError {
        let (kind, message, reason) = match &cause {
            None => (ErrorKind::CommandFailed, failure_message(command, output, exit_code), None),
            Some(RunError::Launch { program, source }) => (
                if source.kind() == std::io::ErrorKind::PermissionDenied {
                    ErrorKind::PermissionDenied
                } else {
                    launch_kind
                },
                format!("Failed to launch {program}: {source}"),
                None,
            ),
            Some(RunError::Cancelled { .. }) => (
                ErrorKind::Timeout,
                format!("Cancelled: {command}"),
                Some("cancelled"),
            ),
            Some(RunError::TimedOut { elapsed, .. }) => (
                ErrorKind::Timeout,
                format!("Timed out after {}s: {command}", elapsed.as_secs()),
                Some("deadline"),
            ),
            Some(RunError::Io(e)) => (
                ErrorKind::CommandFailed,
                format!("I/O error while running {command}: {e}"),
                None,
            ),
        };

        let exit_code = exit_code.or_else(|| cause.as_ref().and_then(RunError::exit_code));
        let mut err = ClassifiedError::new(kind, message)
            .with_command(command)
            .with_output(output);
        if let Some(code) = exit_code {
            err = err.with_exit_code(code);
        }
        if let Some(reason) = reason {
            err = err.with_context("reason", reason);
        }

        err = self.enrich(err, output);
        if let Some(cause) = cause {
            err = err.with_cause(cause);
        }
        err
    }

    /// Classify raw bytes, decoding them lossily.
    pub fn classify_bytes(
        &self,
        command: &str,
        output: &[u8],
        exit_code: Option<i32>,
    ) -> ClassifiedError {
        self.classify(command, &String::from_utf8_lossy(output), exit_code, None)
    }

    /// Classify a process that ran to completion with a non-zero exit code.
    pub fn classify_exit(&self, command: &str, output: &CommandOutput) -> ClassifiedError {
        self.classify(command, &output.output, Some(output.exit_code), None)
    }

    /// Classify a structural runner failure of pip.
    pub fn classify_run_error(&self, command: &str, err: RunError) -> ClassifiedError {
        self.classify_run_error_as(command, err, ErrorKind::ToolNotInstalled)
    }

    /// Classify a structural runner failure; a launch failure becomes
    /// `launch_kind`, e.g. [`ErrorKind::RuntimeNotFound`] for the interpreter.
    pub fn classify_run_error_as(
        &self,
        command: &str,
        err: RunError,
        launch_kind: ErrorKind,
    ) -> ClassifiedError {
        let output = err.partial_output().unwrap_or_default().to_string();
        self.classify_with_launch_kind(command, &output, None, Some(err), launch_kind)
    }

    /// Apply every matching signature to `err`.
    pub fn enrich(&self, mut err: ClassifiedError, output: &str) -> ClassifiedError {
        let haystack = output.to_lowercase();
        let mut refined = err.kind() != ErrorKind::CommandFailed;
        let mut matched = Vec::new();

        for signature in self.signatures.iter().filter(|s| s.matches(&haystack)) {
            matched.push(signature.name);
            if !refined {
                if let Some(kind) = signature.kind {
                    err = err.with_kind(kind);
                    refined = true;
                }
            }
            for suggestion in signature.suggestions {
                err = err.with_suggestion(*suggestion);
            }
        }

        if !matched.is_empty() {
            debug!(signatures = ?matched, kind = %err.kind(), "classified failure");
            err = err.with_context("signatures", matched.join(","));
        }
        err
    }
}

fn failure_message(command: &str, output: &str, exit_code: Option<i32>) -> String {
    // pip puts the useful line last and prefixes it with ERROR:
    let error_line = output
        .lines()
        .rev()
        .map(str::trim)
        .find_map(|line| line.strip_prefix("ERROR:"))
        .map(str::trim)
        .filter(|line| !line.is_empty());

    match (error_line, exit_code) {
        (Some(line), _) => line.to_string(),
        (None, Some(LAUNCH_FAILURE_EXIT_CODE)) => format!("Failed to launch: {command}"),
        (None, Some(code)) => format!("Command exited with code {code}: {command}"),
        (None, None) => format!("Command failed: {command}"),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn classifier() -> ErrorClassifier {
        ErrorClassifier::default()
    }

    #[test]
    fn test_permission_denied_suggests_privileges_or_isolation() {
        let err = classifier().classify(
            "pip install foo",
            "ERROR: Could not install packages due to an OSError: [Errno 13] Permission denied: '/usr/lib/python3'",
            Some(1),
            None,
        );
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
        assert!(err.suggestions().iter().any(|s| {
            s.contains("elevated privileges") || s.contains("isolated")
        }));
        assert!(err.message().starts_with("Could not install packages"));
    }

    #[test]
    fn test_unmatched_output_has_no_suggestions() {
        let err = classifier().classify("pip frobnicate", "something odd", Some(2), None);
        assert_eq!(err.kind(), ErrorKind::CommandFailed);
        assert!(err.suggestions().is_empty());
        assert_eq!(err.exit_code(), Some(2));
        assert_eq!(err.message(), "Command exited with code 2: pip frobnicate");
    }

    #[test]
    fn test_first_refining_signature_wins() {
        let output = "ERROR: No matching distribution found for foo\nConnection error: timed out";
        let err = classifier().classify("pip install foo", output, Some(1), None);
        assert_eq!(err.kind(), ErrorKind::PackageNotFound);
        // later matches still contribute hints
        assert!(err.suggestions().iter().any(|s| s.contains("network")));
    }

    #[test]
    fn test_structural_kind_is_not_refined() {
        let err = classifier().classify_run_error(
            "pip install foo",
            RunError::Cancelled {
                output: "Permission denied".to_string(),
                elapsed: Duration::from_millis(5),
            },
        );
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert_eq!(err.context().get("reason").map(String::as_str), Some("cancelled"));
        assert!(!err.suggestions().is_empty());
    }

    #[test]
    fn test_deadline_reason() {
        let err = classifier().classify_run_error(
            "pip download x",
            RunError::TimedOut {
                output: String::new(),
                elapsed: Duration::from_secs(30),
            },
        );
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert_eq!(err.context().get("reason").map(String::as_str), Some("deadline"));
    }

    #[test]
    fn test_launch_failure_uses_sentinel() {
        let err = classifier().classify_run_error(
            "pip3 list",
            RunError::Launch {
                program: "pip3".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            },
        );
        assert_eq!(err.kind(), ErrorKind::ToolNotInstalled);
        assert_eq!(err.exit_code(), Some(LAUNCH_FAILURE_EXIT_CODE));
    }

    #[test]
    fn test_interpreter_launch_failure() {
        let err = classifier().classify_run_error_as(
            "python3 -m venv .venv",
            RunError::Launch {
                program: "python3".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            },
            ErrorKind::RuntimeNotFound,
        );
        assert_eq!(err.kind(), ErrorKind::RuntimeNotFound);
        assert_eq!(err.exit_code(), Some(LAUNCH_FAILURE_EXIT_CODE));

        // a permission problem stays a permission problem
        let err = classifier().classify_run_error_as(
            "python3 -m venv .venv",
            RunError::Launch {
                program: "python3".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            },
            ErrorKind::RuntimeNotFound,
        );
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_already_satisfied_only_adds_hints() {
        let output = "Requirement already satisfied: requests in /usr/lib/python3/site-packages (2.31.0)\n\
                      ERROR: Cannot uninstall requests 2.31.0, RECORD file not found.";
        let err = classifier().classify("pip install requests", output, Some(1), None);
        assert_eq!(err.kind(), ErrorKind::CommandFailed);
        assert!(err.suggestions().iter().any(|s| s.contains("--upgrade")));
        assert!(err.suggestions().iter().any(|s| s.contains("--force-reinstall")));
        assert_eq!(
            err.context().get("signatures").map(String::as_str),
            Some("already-satisfied")
        );
    }

    #[test]
    fn test_suggestions_are_deduplicated() {
        let output = "Permission denied\nAccess is denied\nPermission denied";
        let err = classifier().classify("pip install x", output, Some(1), None);
        let unique: std::collections::BTreeSet<_> = err.suggestions().iter().collect();
        assert_eq!(unique.len(), err.suggestions().len());
    }

    #[test]
    fn test_non_utf8_output_does_not_panic() {
        let err = classifier().classify_bytes("pip list", b"\xff\xfeno space left on device", Some(1));
        assert_eq!(err.kind(), ErrorKind::CommandFailed);
        assert_eq!(err.suggestions().len(), 1);
    }

    #[test]
    fn test_custom_signature_table() {
        const CUSTOM: Signature = Signature {
            name: "corp-proxy",
            patterns: &["407 proxy authentication required"],
            kind: Some(ErrorKind::NetworkError),
            suggestions: &["Log in to the corporate proxy"],
        };
        let err = ErrorClassifier::with_signatures(vec![CUSTOM]).classify(
            "pip install x",
            "HTTP 407 Proxy Authentication Required",
            Some(1),
            None,
        );
        assert_eq!(err.kind(), ErrorKind::NetworkError);
        assert_eq!(err.suggestions(), ["Log in to the corporate proxy".to_string()]);

        let extended = classifier().extended([CUSTOM]);
        assert_eq!(extended.signatures().len(), DEFAULT_SIGNATURES.len() + 1);
    }
}
