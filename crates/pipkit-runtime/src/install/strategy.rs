//! Installation strategy trait and the environment strategies run in.

use std::fmt;

use async_trait::async_trait;
use pipkit_core::{
    ClassifiedError, CommandInvocation, CommandOutput, CommandRunner, ErrorClassifier, ErrorKind,
    ExecContext, ExecutableRef, PipConfig,
};
use thiserror::Error;

/// Families of installation procedures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    BootstrapModule,
    RemoteBootstrapScript,
    OsPackageManager,
    ThirdPartyPackageManager,
}

impl StrategyKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BootstrapModule => "bootstrap-module",
            Self::RemoteBootstrapScript => "remote-bootstrap-script",
            Self::OsPackageManager => "os-package-manager",
            Self::ThirdPartyPackageManager => "third-party-package-manager",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A strategy's pre-check failed; the orchestrator moves on without counting
/// it as an install failure.
#[derive(Debug, Clone, Error)]
#[error("{reason}")]
pub struct Unavailable {
    pub reason: String,
    /// Unavailable because configuration switched it off, not because the
    /// host lacks something.
    pub disabled: bool,
}

impl Unavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            disabled: false,
        }
    }

    pub fn disabled(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            disabled: true,
        }
    }
}

/// What a strategy gets to work with.
#[derive(Clone, Copy)]
pub struct InstallEnv<'a> {
    pub runner: &'a dyn CommandRunner,
    pub classifier: &'a ErrorClassifier,
    pub config: &'a PipConfig,
    /// Resolved interpreter, when one was found.
    pub runtime: Option<&'a ExecutableRef>,
}

impl fmt::Debug for InstallEnv<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstallEnv")
            .field("runtime", &self.runtime)
            .finish_non_exhaustive()
    }
}

impl InstallEnv<'_> {
    /// Build an invocation carrying the configured environment overlay and timeout.
    pub fn invocation(&self, executable: ExecutableRef) -> CommandInvocation {
        CommandInvocation::new(executable)
            .envs(&self.config.environment)
            .timeout(self.config.command_timeout)
    }

    /// Run a command, classifying structural failures. Non-zero exits are returned as-is.
    ///
    /// `launch_kind` is the error kind when the program cannot be started.
    pub async fn run_raw(
        &self,
        invocation: &CommandInvocation,
        ctx: &ExecContext,
        launch_kind: ErrorKind,
    ) -> Result<CommandOutput, ClassifiedError> {
        self.runner.run(invocation, ctx).await.map_err(|e| {
            self.classifier
                .classify_run_error_as(&invocation.command_line(), e, launch_kind)
        })
    }

    /// Run a command and classify any failure, including a non-zero exit.
    pub async fn run(
        &self,
        invocation: &CommandInvocation,
        ctx: &ExecContext,
        launch_kind: ErrorKind,
    ) -> Result<CommandOutput, ClassifiedError> {
        let output = self.run_raw(invocation, ctx, launch_kind).await?;
        if output.success() {
            Ok(output)
        } else {
            Err(self
                .classifier
                .classify_exit(&invocation.command_line(), &output))
        }
    }

    /// The interpreter, or the reason a runtime-based strategy cannot run.
    pub fn require_runtime(&self) -> Result<&ExecutableRef, Unavailable> {
        self.runtime
            .ok_or_else(|| Unavailable::new("no Python interpreter was found"))
    }
}

/// One way of getting pip onto the host.
///
/// Strategies hold no state between calls: the pre-check decides whether the
/// host can use the strategy at all, `install` does the work.
#[async_trait]
pub trait InstallStrategy: Send + Sync {
    /// Human-readable name, e.g. `apt-get` or `bootstrap-module`.
    fn name(&self) -> &str;

    fn kind(&self) -> StrategyKind;

    /// Capability pre-check.
    async fn check(&self, env: &InstallEnv<'_>, ctx: &ExecContext) -> Result<(), Unavailable>;

    /// Install pip.
    async fn install(&self, env: &InstallEnv<'_>, ctx: &ExecContext)
    -> Result<(), ClassifiedError>;
}
