//! Ordered fallback over installation strategies.
//!
//! Strategies run strictly in order. A strategy whose pre-check fails is
//! skipped as unavailable; a strategy whose install fails hands over to the
//! next one. The first success ends the run. Nothing is retried or run
//! concurrently.

use std::time::{Duration, Instant};

use pipkit_core::{ClassifiedError, ErrorKind, ExecContext, OsFamily};
use tracing::{debug, info, warn};

use super::bootstrap::{BootstrapModule, RemoteBootstrapScript};
use super::package_manager::PackageManagerStrategy;
use super::strategy::{InstallEnv, InstallStrategy};

/// Where the orchestrator is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallState {
    NotAttempted,
    /// Index of the strategy currently running.
    Trying(usize),
    Succeeded,
    ExhaustedFailed,
}

/// How one strategy fared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Unavailable { reason: String, disabled: bool },
    Failed { kind: ErrorKind, message: String },
    Succeeded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyAttempt {
    pub strategy: String,
    pub outcome: AttemptOutcome,
}

/// Summary of an install run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    /// Strategy that installed pip; `None` when pip was already present.
    pub strategy: Option<String>,
    pub attempts: Vec<StrategyAttempt>,
    pub duration: Duration,
}

impl InstallReport {
    /// Report for a host that already had pip.
    pub const fn already_installed() -> Self {
        Self {
            strategy: None,
            attempts: Vec::new(),
            duration: Duration::ZERO,
        }
    }

    pub const fn was_already_installed(&self) -> bool {
        self.strategy.is_none()
    }
}

/// Runs an ordered list of strategies until one succeeds.
pub struct InstallOrchestrator {
    strategies: Vec<Box<dyn InstallStrategy>>,
    state: InstallState,
}

impl std::fmt::Debug for InstallOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.strategies.iter().map(|s| s.name()).collect();
        f.debug_struct("InstallOrchestrator")
            .field("strategies", &names)
            .field("state", &self.state)
            .finish()
    }
}

impl InstallOrchestrator {
    /// Orchestrator over an explicit strategy list.
    pub fn new(strategies: Vec<Box<dyn InstallStrategy>>) -> Self {
        Self {
            strategies,
            state: InstallState::NotAttempted,
        }
    }

    /// The default strategy order for an OS family.
    pub fn for_os(os: OsFamily) -> Result<Self, ClassifiedError> {
        let strategies: Vec<Box<dyn InstallStrategy>> = match os {
            OsFamily::Windows => vec![
                Box::new(BootstrapModule),
                Box::new(RemoteBootstrapScript::new()),
                Box::new(PackageManagerStrategy::chocolatey()),
                Box::new(PackageManagerStrategy::scoop()),
            ],
            OsFamily::Linux => vec![
                Box::new(PackageManagerStrategy::linux()),
                Box::new(BootstrapModule),
                Box::new(RemoteBootstrapScript::new()),
            ],
            OsFamily::MacOs => vec![
                Box::new(PackageManagerStrategy::homebrew()),
                Box::new(BootstrapModule),
                Box::new(RemoteBootstrapScript::new()),
            ],
            OsFamily::Other => {
                return Err(ClassifiedError::new(
                    ErrorKind::UnsupportedPlatform,
                    format!("No pip installation strategy for {}", std::env::consts::OS),
                )
                .with_context("os", std::env::consts::OS)
                .with_suggestion("Install pip manually: https://pip.pypa.io/en/stable/installation/"));
            }
        };
        Ok(Self::new(strategies))
    }

    pub const fn state(&self) -> InstallState {
        self.state
    }

    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Try each strategy in order until one succeeds.
    pub async fn run(
        &mut self,
        env: &InstallEnv<'_>,
        ctx: &ExecContext,
    ) -> Result<InstallReport, ClassifiedError> {
        let started = Instant::now();
        let mut attempts = Vec::with_capacity(self.strategies.len());
        let mut last_failure: Option<ClassifiedError> = None;

        for (index, strategy) in self.strategies.iter().enumerate() {
            if ctx.is_cancelled() {
                self.state = InstallState::ExhaustedFailed;
                return Err(cancelled_error(&attempts));
            }
            self.state = InstallState::Trying(index);
            let name = strategy.name().to_string();
            debug!(strategy = %name, index, "Checking install strategy");

            if let Err(unavailable) = strategy.check(env, ctx).await {
                debug!(strategy = %name, reason = %unavailable, "Install strategy unavailable");
                attempts.push(StrategyAttempt {
                    strategy: name,
                    outcome: AttemptOutcome::Unavailable {
                        reason: unavailable.reason,
                        disabled: unavailable.disabled,
                    },
                });
                continue;
            }

            info!(strategy = %name, "Installing pip");
            match strategy.install(env, ctx).await {
                Ok(()) => {
                    info!(strategy = %name, "pip installed");
                    attempts.push(StrategyAttempt {
                        strategy: name.clone(),
                        outcome: AttemptOutcome::Succeeded,
                    });
                    self.state = InstallState::Succeeded;
                    return Ok(InstallReport {
                        strategy: Some(name),
                        attempts,
                        duration: started.elapsed(),
                    });
                }
                Err(err) => {
                    warn!(strategy = %name, kind = %err.kind(), "Install strategy failed: {err}");
                    attempts.push(StrategyAttempt {
                        strategy: name,
                        outcome: AttemptOutcome::Failed {
                            kind: err.kind(),
                            message: err.message().to_string(),
                        },
                    });
                    if is_cancellation(&err) {
                        self.state = InstallState::ExhaustedFailed;
                        return Err(err);
                    }
                    last_failure = Some(err);
                }
            }
        }

        self.state = InstallState::ExhaustedFailed;
        Err(exhausted_error(&attempts, last_failure))
    }
}

fn is_cancellation(err: &ClassifiedError) -> bool {
    err.kind() == ErrorKind::Timeout
        && err.context().get("reason").map(String::as_str) == Some("cancelled")
}

fn cancelled_error(attempts: &[StrategyAttempt]) -> ClassifiedError {
    with_attempts(
        ClassifiedError::new(ErrorKind::Timeout, "pip installation cancelled")
            .with_context("reason", "cancelled"),
        attempts,
    )
}

fn exhausted_error(
    attempts: &[StrategyAttempt],
    last_failure: Option<ClassifiedError>,
) -> ClassifiedError {
    let any_disabled = attempts.iter().any(|a| {
        matches!(a.outcome, AttemptOutcome::Unavailable { disabled: true, .. })
    });

    let err = match last_failure {
        Some(failure) => {
            let mut err = ClassifiedError::new(
                failure.kind(),
                format!("All pip installation strategies failed; last error: {}", failure.message()),
            );
            if let Some(command) = failure.command() {
                err = err.with_command(command);
            }
            if let Some(output) = failure.output() {
                err = err.with_output(output);
            }
            if let Some(code) = failure.exit_code() {
                err = err.with_exit_code(code);
            }
            for suggestion in failure.suggestions() {
                err = err.with_suggestion(suggestion.clone());
            }
            err.with_cause(failure)
        }
        None if any_disabled => ClassifiedError::new(
            ErrorKind::FeatureDisabled,
            "No pip installation strategy is available and the network bootstrap is disabled",
        )
        .with_suggestion("Enable allow_network_bootstrap in the configuration"),
        None => ClassifiedError::new(
            ErrorKind::ToolNotInstalled,
            "No pip installation strategy is available on this host",
        ),
    };

    with_attempts(err, attempts)
        .with_suggestion("Install pip manually: https://pip.pypa.io/en/stable/installation/")
}

/// Record every strategy's outcome in the error context.
fn with_attempts(mut err: ClassifiedError, attempts: &[StrategyAttempt]) -> ClassifiedError {
    for attempt in attempts {
        let detail = match &attempt.outcome {
            AttemptOutcome::Unavailable { reason, .. } => format!("unavailable: {reason}"),
            AttemptOutcome::Failed { kind, message } => format!("failed ({kind}): {message}"),
            AttemptOutcome::Succeeded => "succeeded".to_string(),
        };
        err = err.with_context(format!("strategy.{}", attempt.strategy), detail);
    }
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::install::strategy::{StrategyKind, Unavailable};
    use async_trait::async_trait;
    use pipkit_core::{
        CommandInvocation, CommandOutput, CommandRunner, ErrorClassifier, PipConfig, RunError,
    };
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct NoopRunner;

    #[async_trait]
    impl CommandRunner for NoopRunner {
        async fn run(
            &self,
            _invocation: &CommandInvocation,
            _ctx: &ExecContext,
        ) -> Result<CommandOutput, RunError> {
            unreachable!("fake strategies never run commands")
        }
    }

    #[derive(Clone, Copy)]
    enum Behavior {
        Succeed,
        Fail,
        Unavailable,
        Disabled,
        CancelDuringInstall,
    }

    struct FakeStrategy {
        name: &'static str,
        behavior: Behavior,
        checks: Arc<AtomicUsize>,
        installs: Arc<AtomicUsize>,
        log: Arc<std::sync::Mutex<Vec<&'static str>>>,
    }

    #[async_trait]
    impl InstallStrategy for FakeStrategy {
        fn name(&self) -> &str {
            self.name
        }

        fn kind(&self) -> StrategyKind {
            StrategyKind::BootstrapModule
        }

        async fn check(&self, _env: &InstallEnv<'_>, _ctx: &ExecContext) -> Result<(), Unavailable> {
            self.checks.fetch_add(1, Ordering::SeqCst);
            match self.behavior {
                Behavior::Unavailable => Err(Unavailable::new("missing")),
                Behavior::Disabled => Err(Unavailable::disabled("switched off")),
                _ => Ok(()),
            }
        }

        async fn install(
            &self,
            _env: &InstallEnv<'_>,
            ctx: &ExecContext,
        ) -> Result<(), ClassifiedError> {
            self.installs.fetch_add(1, Ordering::SeqCst);
            self.log.lock().unwrap().push(self.name);
            match self.behavior {
                Behavior::Succeed => Ok(()),
                Behavior::CancelDuringInstall => {
                    ctx.cancel();
                    Err(ClassifiedError::new(ErrorKind::Timeout, "cancelled")
                        .with_context("reason", "cancelled"))
                }
                _ => Err(ClassifiedError::new(ErrorKind::PermissionDenied, format!("{} failed", self.name))
                    .with_suggestion("use sudo")),
            }
        }
    }

    struct Harness {
        installs: Vec<Arc<AtomicUsize>>,
        log: Arc<std::sync::Mutex<Vec<&'static str>>>,
        orchestrator: InstallOrchestrator,
    }

    fn harness(plan: &[(&'static str, Behavior)]) -> Harness {
        let log = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut installs = Vec::new();
        let mut strategies: Vec<Box<dyn InstallStrategy>> = Vec::new();
        for (name, behavior) in plan {
            let counter = Arc::new(AtomicUsize::new(0));
            installs.push(Arc::clone(&counter));
            strategies.push(Box::new(FakeStrategy {
                name: *name,
                behavior: *behavior,
                checks: Arc::new(AtomicUsize::new(0)),
                installs: counter,
                log: Arc::clone(&log),
            }));
        }
        Harness {
            installs,
            log,
            orchestrator: InstallOrchestrator::new(strategies),
        }
    }

    async fn run(orchestrator: &mut InstallOrchestrator) -> Result<InstallReport, ClassifiedError> {
        let config = PipConfig::default();
        let classifier = ErrorClassifier::default();
        let env = InstallEnv {
            runner: &NoopRunner,
            classifier: &classifier,
            config: &config,
            runtime: None,
        };
        orchestrator.run(&env, &ExecContext::new()).await
    }

    #[tokio::test]
    async fn test_stops_at_first_success() {
        let mut h = harness(&[
            ("a", Behavior::Fail),
            ("b", Behavior::Succeed),
            ("c", Behavior::Succeed),
        ]);
        let report = run(&mut h.orchestrator).await.unwrap();

        assert_eq!(report.strategy.as_deref(), Some("b"));
        assert_eq!(h.installs[2].load(Ordering::SeqCst), 0);
        assert_eq!(*h.log.lock().unwrap(), vec!["a", "b"]);
        assert_eq!(h.orchestrator.state(), InstallState::Succeeded);
    }

    #[tokio::test]
    async fn test_all_failures_run_in_order() {
        let mut h = harness(&[
            ("a", Behavior::Fail),
            ("b", Behavior::Unavailable),
            ("c", Behavior::Fail),
        ]);
        let err = run(&mut h.orchestrator).await.unwrap_err();

        assert_eq!(*h.log.lock().unwrap(), vec!["a", "c"]);
        assert_eq!(h.installs[1].load(Ordering::SeqCst), 0);
        assert_eq!(h.orchestrator.state(), InstallState::ExhaustedFailed);
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
        assert_eq!(err.context().len(), 3);
        assert!(err.context()["strategy.b"].starts_with("unavailable"));
        assert!(err.suggestions().iter().any(|s| s == "use sudo"));
    }

    #[tokio::test]
    async fn test_only_disabled_strategies_is_feature_disabled() {
        let mut h = harness(&[("a", Behavior::Unavailable), ("b", Behavior::Disabled)]);
        let err = run(&mut h.orchestrator).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FeatureDisabled);
    }

    #[tokio::test]
    async fn test_nothing_available_is_tool_not_installed() {
        let mut h = harness(&[("a", Behavior::Unavailable)]);
        let err = run(&mut h.orchestrator).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ToolNotInstalled);
    }

    #[tokio::test]
    async fn test_cancellation_stops_the_chain() {
        let mut h = harness(&[
            ("a", Behavior::CancelDuringInstall),
            ("b", Behavior::Succeed),
        ]);
        let err = run(&mut h.orchestrator).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert_eq!(h.installs[1].load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_default_order_per_os() {
        let linux = InstallOrchestrator::for_os(OsFamily::Linux).unwrap();
        assert_eq!(
            linux.strategy_names(),
            vec!["os-package-manager", "bootstrap-module", "remote-bootstrap-script"]
        );

        let windows = InstallOrchestrator::for_os(OsFamily::Windows).unwrap();
        assert_eq!(
            windows.strategy_names(),
            vec!["bootstrap-module", "remote-bootstrap-script", "chocolatey", "scoop"]
        );

        let macos = InstallOrchestrator::for_os(OsFamily::MacOs).unwrap();
        assert_eq!(macos.strategy_names()[0], "homebrew");

        let err = InstallOrchestrator::for_os(OsFamily::Other).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedPlatform);
        assert_eq!(
            InstallOrchestrator::for_os(OsFamily::Linux).unwrap().state(),
            InstallState::NotAttempted
        );
    }
}
