//! Command runner port.
//!
//! The engine runs pip, the interpreter and OS package managers through this
//! trait only. The production implementation lives in `pipkit-runtime`;
//! tests script it with `mockall`.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{CommandInvocation, CommandOutput, ExecContext, LAUNCH_FAILURE_EXIT_CODE};

/// Structural failures of a single command run.
///
/// A non-zero exit is *not* a `RunError`: it comes back as a
/// [`CommandOutput`] and is classified by the caller.
#[derive(Debug, Error)]
pub enum RunError {
    /// The process could not be started.
    #[error("Failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The cancellation token fired before the process exited.
    #[error("Command cancelled after {elapsed:?}")]
    Cancelled { output: String, elapsed: Duration },

    /// The deadline elapsed before the process exited.
    #[error("Command timed out after {elapsed:?}")]
    TimedOut { output: String, elapsed: Duration },

    /// Reading output or waiting on the child failed.
    #[error("I/O error while running command: {0}")]
    Io(#[from] std::io::Error),
}

impl RunError {
    /// Exit code reported for this failure, if any.
    pub const fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Launch { .. } => Some(LAUNCH_FAILURE_EXIT_CODE),
            _ => None,
        }
    }

    /// Output captured before the process was stopped.
    pub fn partial_output(&self) -> Option<&str> {
        match self {
            Self::Cancelled { output, .. } | Self::TimedOut { output, .. } => Some(output),
            _ => None,
        }
    }

    /// True for both cancellation and deadline expiry.
    pub const fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled { .. } | Self::TimedOut { .. })
    }
}

/// Port for executing external commands.
///
/// Implementations must:
/// - apply `invocation.env` on top of the inherited environment
/// - capture stdout then stderr as one string
/// - terminate the child and return [`RunError::Cancelled`] /
///   [`RunError::TimedOut`] when the context fires first, including when the
///   token is already cancelled before launch
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(
        &self,
        invocation: &CommandInvocation,
        ctx: &ExecContext,
    ) -> Result<CommandOutput, RunError>;
}
