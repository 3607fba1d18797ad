//! Command invocations and their results.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::ExecutableRef;

/// Exit code reported when the process never started.
pub const LAUNCH_FAILURE_EXIT_CODE: i32 = -1;

/// Exit code reported when the process was terminated by a signal.
pub const SIGNALLED_EXIT_CODE: i32 = -2;

/// One external command to run.
///
/// The environment overlay is applied to the child only; the caller's
/// process environment is never touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub executable: ExecutableRef,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
    /// Per-invocation deadline. Falls back to the [`ExecContext`] timeout.
    pub timeout: Option<Duration>,
}

impl CommandInvocation {
    pub fn new(executable: ExecutableRef) -> Self {
        Self {
            executable,
            args: Vec::new(),
            env: BTreeMap::new(),
            timeout: None,
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Merge an environment overlay. Later entries replace earlier ones.
    #[must_use]
    pub fn envs(mut self, env: &BTreeMap<String, String>) -> Self {
        self.env
            .extend(env.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Full argv including the executable's leading arguments.
    pub fn argv(&self) -> Vec<String> {
        self.executable.argv(&self.args)
    }

    /// Space-joined command line for logs and error reports.
    pub fn command_line(&self) -> String {
        self.argv().join(" ")
    }
}

impl fmt::Display for CommandInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// Captured result of a process that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// stdout followed by stderr, decoded lossily.
    pub output: String,
    pub exit_code: i32,
    pub duration: Duration,
}

impl CommandOutput {
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Cancellation scope for one logical operation.
///
/// Cloning shares the token; [`ExecContext::child`] derives a scope that is
/// cancelled with its parent but can also be cancelled on its own.
#[derive(Debug, Clone, Default)]
pub struct ExecContext {
    token: CancellationToken,
    timeout: Option<Duration>,
}

impl ExecContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing token, e.g. one cancelled by a Ctrl-C handler.
    pub const fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            timeout: None,
        }
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Derived scope sharing this context's timeout.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            timeout: self.timeout,
        }
    }

    pub const fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Deadline for `invocation`: its own timeout first, then the context's.
    pub fn deadline_for(&self, invocation: &CommandInvocation) -> Option<Duration> {
        invocation.timeout.or(self.timeout)
    }
}
