//! CLI-specific error types and mappings.
//!
//! This module maps engine errors to exit codes and user-facing messages.

use pipkit_core::{ClassifiedError, ConfigError, ErrorKind};
use thiserror::Error;

/// Exit code used when the user interrupted the command.
pub const EXIT_INTERRUPTED: i32 = 130;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Engine failure.
    #[error(transparent)]
    Engine(#[from] ClassifiedError),

    /// Configuration could not be loaded or failed validation.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Argument combination the parser cannot express.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// `check` found broken requirements.
    #[error("{0} broken requirement(s) found")]
    Problems(usize),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Engine(err) => exit_code_for(err),
            Self::Config(_) => 78, // EX_CONFIG
            Self::Arguments(_) => 2,
            Self::Problems(_) => 1,
        }
    }

    /// Message followed by one `hint:` line per suggestion.
    pub fn render(&self) -> String {
        match self {
            Self::Engine(err) => render_classified(err),
            other => format!("error: {other}"),
        }
    }
}

/// Exit code for a classified engine error.
pub fn exit_code_for(err: &ClassifiedError) -> i32 {
    match err.kind() {
        ErrorKind::CommandFailed => 1,
        ErrorKind::InvalidSpecification | ErrorKind::InvalidPath => 2,
        ErrorKind::PackageNotFound | ErrorKind::EnvironmentNotFound | ErrorKind::FileNotFound => {
            66 // EX_NOINPUT
        }
        ErrorKind::ToolNotInstalled
        | ErrorKind::RuntimeNotFound
        | ErrorKind::UnsupportedPlatform
        | ErrorKind::FeatureDisabled => 69, // EX_UNAVAILABLE
        ErrorKind::EnvironmentAlreadyExists => 73, // EX_CANTCREAT
        ErrorKind::NetworkError => 75,             // EX_TEMPFAIL
        ErrorKind::Timeout => {
            if err.context().get("reason").is_some_and(|r| r == "cancelled") {
                EXIT_INTERRUPTED
            } else {
                75
            }
        }
        ErrorKind::PermissionDenied => 77, // EX_NOPERM
        ErrorKind::InvalidConfiguration => 78,
    }
}

fn render_classified(err: &ClassifiedError) -> String {
    let mut out = format!("error: {}", err.message());
    if let Some(excerpt) = err.output_excerpt() {
        // The last output line usually carries pip's own diagnosis.
        if let Some(last) = excerpt.lines().rev().find(|l| !l.trim().is_empty()) {
            if !err.message().contains(last.trim()) {
                out.push_str("\n  ");
                out.push_str(last.trim());
            }
        }
    }
    for hint in err.suggestions() {
        out.push_str("\nhint: ");
        out.push_str(hint);
    }
    out
}

/// Print `err` to stderr and return the exit code for it.
pub fn report(err: &anyhow::Error) -> i32 {
    if let Some(cli) = err.downcast_ref::<CliError>() {
        eprintln!("{}", cli.render());
        return cli.exit_code();
    }
    if let Some(classified) = err.downcast_ref::<ClassifiedError>() {
        eprintln!("{}", render_classified(classified));
        return exit_code_for(classified);
    }
    eprintln!("error: {err:#}");
    1
}
