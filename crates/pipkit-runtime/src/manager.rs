//! The pip operation surface.
//!
//! [`PipManager`] ties the pieces together for every call:
//! resolve executables → run through the [`CommandRunner`] → interpret the
//! output on success, classify it on failure. It holds no mutable state;
//! the caller passes the [`PipConfig`] snapshot and [`ExecContext`] each time.

use std::path::Path;
use std::sync::Arc;

use pipkit_core::config::VENV_MARKER;
use pipkit_core::{
    ClassifiedError, CommandInvocation, CommandOutput, CommandRunner, ErrorClassifier, ErrorKind,
    ExecContext, ExecutableRef, PackageDetail, PackageRecord, PipConfig, PipResult, ReadOperation,
    ReadOutput, ToolVersion, WriteOperation, parse_check, parse_freeze, parse_list,
    parse_show_many, parse_version,
};
use tracing::{debug, info};

use crate::install::{InstallEnv, InstallOrchestrator, InstallReport};
use crate::locate::Locator;
use crate::runner::TokioCommandRunner;

/// pip operations for one host.
#[derive(Clone)]
pub struct PipManager {
    runner: Arc<dyn CommandRunner>,
    locator: Locator,
    classifier: ErrorClassifier,
}

impl std::fmt::Debug for PipManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipManager")
            .field("locator", &self.locator)
            .finish_non_exhaustive()
    }
}

impl Default for PipManager {
    fn default() -> Self {
        Self::new(Arc::new(TokioCommandRunner::new()))
    }
}

impl PipManager {
    /// Manager using `runner` for every command.
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            locator: Locator::default(),
            classifier: ErrorClassifier::default(),
        }
    }

    #[must_use]
    pub const fn with_locator(mut self, locator: Locator) -> Self {
        self.locator = locator;
        self
    }

    #[must_use]
    pub fn with_classifier(mut self, classifier: ErrorClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub const fn locator(&self) -> &Locator {
        &self.locator
    }

    // ------------------------------------------------------------------------
    // Tool lifecycle
    // ------------------------------------------------------------------------

    /// Whether pip can be resolved and answers `--version`.
    pub async fn is_installed(&self, config: &PipConfig, ctx: &ExecContext) -> bool {
        let Ok(tool) = self.locator.resolve_tool(config) else {
            return false;
        };
        let invocation = self.invocation(config, tool).arg("--version");
        matches!(self.runner.run(&invocation, ctx).await, Ok(output) if output.success())
    }

    /// Install pip if it is missing, trying the platform's strategies in order.
    pub async fn install(&self, config: &PipConfig, ctx: &ExecContext) -> PipResult<InstallReport> {
        if self.is_installed(config, ctx).await {
            info!("pip is already installed");
            return Ok(InstallReport::already_installed());
        }

        let runtime = match self.locator.resolve_runtime(config) {
            Ok(runtime) => Some(runtime),
            Err(e) => {
                debug!("{e}; only package manager strategies can run");
                None
            }
        };

        let mut orchestrator = InstallOrchestrator::for_os(self.locator.os())?;
        let env = InstallEnv {
            runner: self.runner.as_ref(),
            classifier: &self.classifier,
            config,
            runtime: runtime.as_ref(),
        };
        let report = orchestrator.run(&env, ctx).await?;

        if !self.is_installed(config, ctx).await {
            // e.g. the package manager put pip under a name not on PATH yet
            info!("pip installed but not yet resolvable; a new shell may be needed");
        }
        Ok(report)
    }

    /// pip's version number, e.g. `23.2.1`.
    pub async fn version(&self, config: &PipConfig, ctx: &ExecContext) -> PipResult<String> {
        self.version_info(config, ctx).await.map(|v| v.pip)
    }

    /// Full `pip --version` banner.
    pub async fn version_info(
        &self,
        config: &PipConfig,
        ctx: &ExecContext,
    ) -> PipResult<ToolVersion> {
        let tool = self.resolve_tool(config)?;
        let invocation = self.invocation(config, tool).arg("--version");
        let output = self
            .run_checked(&invocation, ctx, ErrorKind::ToolNotInstalled)
            .await?;
        parse_version(&output.output).ok_or_else(|| {
            ClassifiedError::new(ErrorKind::CommandFailed, "Unrecognized pip --version output")
                .with_command(invocation.command_line())
                .with_output(output.output)
        })
    }

    // ------------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------------

    /// Run an operation that inspects the environment.
    pub async fn read(
        &self,
        op: &ReadOperation,
        config: &PipConfig,
        ctx: &ExecContext,
    ) -> PipResult<ReadOutput> {
        let output = self.read_raw(op, config, ctx).await?;
        Ok(match op {
            ReadOperation::List { .. } => ReadOutput::Packages(parse_list(&output)),
            ReadOperation::Freeze { .. } => ReadOutput::Packages(parse_freeze(&output)),
            ReadOperation::Show { .. } => ReadOutput::Details(parse_show_many(&output)),
            ReadOperation::Check => ReadOutput::Problems(parse_check(&output)),
        })
    }

    /// Run an operation that changes the environment.
    pub async fn write(
        &self,
        op: &WriteOperation,
        config: &PipConfig,
        ctx: &ExecContext,
    ) -> PipResult<()> {
        let (invocation, launch_kind) = self.write_invocation(op, config)?;

        info!(operation = op.name(), "Running pip {}", op.name());
        self.run_checked(&invocation, ctx, launch_kind).await?;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Convenience wrappers
    // ------------------------------------------------------------------------

    /// Installed packages.
    pub async fn list(&self, config: &PipConfig, ctx: &ExecContext) -> PipResult<Vec<PackageRecord>> {
        let op = ReadOperation::List {
            outdated: false,
            editable_only: false,
        };
        Ok(parse_list(&self.read_raw(&op, config, ctx).await?))
    }

    /// `pip show` for one package.
    pub async fn show(
        &self,
        package: &str,
        config: &PipConfig,
        ctx: &ExecContext,
    ) -> PipResult<PackageDetail> {
        let op = ReadOperation::Show {
            packages: vec![package.to_string()],
            files: false,
        };
        let output = self.read_raw(&op, config, ctx).await?;
        parse_show_many(&output).into_iter().next().ok_or_else(|| {
            ClassifiedError::new(
                ErrorKind::PackageNotFound,
                format!("Package not installed: {package}"),
            )
            .with_context("package", package)
        })
    }

    /// Pinned requirements of the environment.
    pub async fn freeze(
        &self,
        config: &PipConfig,
        ctx: &ExecContext,
    ) -> PipResult<Vec<PackageRecord>> {
        let output = self
            .read_raw(&ReadOperation::Freeze { all: false }, config, ctx)
            .await?;
        Ok(parse_freeze(&output))
    }

    // ------------------------------------------------------------------------
    // Internal methods
    // ------------------------------------------------------------------------

    fn resolve_tool(&self, config: &PipConfig) -> PipResult<ExecutableRef> {
        self.locator
            .resolve_tool(config)
            .map_err(crate::locate::LocateError::into_tool_error)
    }

    fn invocation(&self, config: &PipConfig, executable: ExecutableRef) -> CommandInvocation {
        CommandInvocation::new(executable)
            .envs(&config.environment)
            .timeout(config.command_timeout)
    }

    /// Run a read operation and return pip's output.
    async fn read_raw(
        &self,
        op: &ReadOperation,
        config: &PipConfig,
        ctx: &ExecContext,
    ) -> PipResult<String> {
        let mut args: Vec<String> = Vec::new();
        match op {
            ReadOperation::List {
                outdated,
                editable_only,
            } => {
                args.extend(["list".to_string(), "--format=json".to_string()]);
                if *outdated {
                    args.push("--outdated".to_string());
                }
                if *editable_only {
                    args.push("--editable".to_string());
                }
            }
            ReadOperation::Show { packages, files } => {
                require_names(packages, "show")?;
                args.push("show".to_string());
                if *files {
                    args.push("--files".to_string());
                }
                args.extend(packages.iter().cloned());
            }
            ReadOperation::Freeze { all } => {
                args.push("freeze".to_string());
                if *all {
                    args.push("--all".to_string());
                }
            }
            ReadOperation::Check => args.push("check".to_string()),
        }

        let invocation = self.pip_invocation(config, args, op.uses_network())?;
        let output = self
            .run(&invocation, ctx, ErrorKind::ToolNotInstalled)
            .await?;

        // pip check exits 1 when it finds problems; that is a result, not a failure
        let problems_found = matches!(op, ReadOperation::Check)
            && output.exit_code == 1
            && !parse_check(&output.output).is_empty();
        if !output.success() && !problems_found {
            return Err(self
                .classifier
                .classify_exit(&invocation.command_line(), &output));
        }
        Ok(output.output)
    }

    /// Invocation for a write operation, validated before anything runs,
    /// and the kind a launch failure of it maps to.
    fn write_invocation(
        &self,
        op: &WriteOperation,
        config: &PipConfig,
    ) -> PipResult<(CommandInvocation, ErrorKind)> {
        let mut args: Vec<String> = Vec::new();
        match op {
            WriteOperation::Install {
                specs,
                upgrade,
                user,
                force_reinstall,
            } => {
                require_specs(specs)?;
                args.push("install".to_string());
                if *upgrade {
                    args.push("--upgrade".to_string());
                }
                if *user {
                    args.push("--user".to_string());
                }
                if *force_reinstall {
                    args.push("--force-reinstall".to_string());
                }
                args.extend(specs.iter().map(|s| s.trim().to_string()));
            }
            WriteOperation::InstallRequirements { path, upgrade } => {
                if !path.is_file() {
                    return Err(ClassifiedError::new(
                        ErrorKind::FileNotFound,
                        format!("Requirements file not found: {}", path.display()),
                    )
                    .with_context("path", path.display().to_string()));
                }
                args.push("install".to_string());
                if *upgrade {
                    args.push("--upgrade".to_string());
                }
                args.extend(["-r".to_string(), path.display().to_string()]);
            }
            WriteOperation::InstallProject { path, editable } => {
                if !path.is_dir() {
                    return Err(ClassifiedError::new(
                        ErrorKind::InvalidPath,
                        format!("Project directory not found: {}", path.display()),
                    )
                    .with_context("path", path.display().to_string())
                    .with_suggestion("Point at a directory containing pyproject.toml or setup.py"));
                }
                args.push("install".to_string());
                if *editable {
                    args.push("--editable".to_string());
                }
                args.push(path.display().to_string());
            }
            WriteOperation::Uninstall { packages } => {
                require_names(packages, "uninstall")?;
                args.extend(["uninstall".to_string(), "--yes".to_string()]);
                args.extend(packages.iter().cloned());
            }
            WriteOperation::Download { specs, dest } => {
                require_specs(specs)?;
                if dest.exists() && !dest.is_dir() {
                    return Err(ClassifiedError::new(
                        ErrorKind::InvalidPath,
                        format!("Download destination is not a directory: {}", dest.display()),
                    )
                    .with_context("path", dest.display().to_string()));
                }
                args.extend(["download".to_string(), "--dest".to_string(), dest.display().to_string()]);
                args.extend(specs.iter().map(|s| s.trim().to_string()));
            }
            WriteOperation::UpgradeTool => {
                args.extend(["install".to_string(), "--upgrade".to_string(), "pip".to_string()]);
            }
            WriteOperation::CreateEnvironment { path, with_pip } => {
                let invocation = self.venv_invocation(config, path, *with_pip)?;
                return Ok((invocation, ErrorKind::RuntimeNotFound));
            }
        }
        let invocation = self.pip_invocation(config, args, op.uses_network())?;
        Ok((invocation, ErrorKind::ToolNotInstalled))
    }

    /// pip invocation with the configured extra options and, for network
    /// operations, the package index plus pip's own timeout and retry count.
    fn pip_invocation(
        &self,
        config: &PipConfig,
        args: Vec<String>,
        network: bool,
    ) -> PipResult<CommandInvocation> {
        let tool = self.resolve_tool(config)?;
        let mut invocation = self
            .invocation(config, tool)
            .args(args)
            .args(["--disable-pip-version-check", "--no-input"])
            .args(config.extra_args());
        if network {
            if let Some(index_url) = &config.index_url {
                invocation = invocation.args(["--index-url".to_string(), index_url.clone()]);
            }
            invocation = invocation.args([
                "--timeout".to_string(),
                config.network_timeout.as_secs().to_string(),
                "--retries".to_string(),
                config.retries.to_string(),
            ]);
        }
        Ok(invocation)
    }

    fn venv_invocation(
        &self,
        config: &PipConfig,
        path: &Path,
        with_pip: bool,
    ) -> PipResult<CommandInvocation> {
        if path.join(VENV_MARKER).exists() {
            return Err(ClassifiedError::new(
                ErrorKind::EnvironmentAlreadyExists,
                format!("A virtual environment already exists at {}", path.display()),
            )
            .with_context("path", path.display().to_string())
            .with_suggestion("Choose another path or remove the existing environment"));
        }
        if path.is_file() {
            return Err(ClassifiedError::new(
                ErrorKind::InvalidPath,
                format!("{} is a file", path.display()),
            )
            .with_context("path", path.display().to_string()));
        }

        let runtime = self
            .locator
            .resolve_runtime(config)
            .map_err(crate::locate::LocateError::into_runtime_error)?;
        let mut invocation = self.invocation(config, runtime).args(["-m", "venv"]);
        if !with_pip {
            invocation = invocation.arg("--without-pip");
        }
        Ok(invocation.arg(path.display().to_string()))
    }

    async fn run(
        &self,
        invocation: &CommandInvocation,
        ctx: &ExecContext,
        launch_kind: ErrorKind,
    ) -> PipResult<CommandOutput> {
        self.runner.run(invocation, ctx).await.map_err(|e| {
            self.classifier
                .classify_run_error_as(&invocation.command_line(), e, launch_kind)
        })
    }

    async fn run_checked(
        &self,
        invocation: &CommandInvocation,
        ctx: &ExecContext,
        launch_kind: ErrorKind,
    ) -> PipResult<CommandOutput> {
        let output = self.run(invocation, ctx, launch_kind).await?;
        if output.success() {
            Ok(output)
        } else {
            Err(self
                .classifier
                .classify_exit(&invocation.command_line(), &output))
        }
    }
}

fn require_specs(specs: &[String]) -> PipResult<()> {
    if specs.is_empty() || specs.iter().any(|s| s.trim().is_empty()) {
        return Err(ClassifiedError::new(
            ErrorKind::InvalidSpecification,
            "At least one non-empty requirement specifier is required",
        )
        .with_suggestion("Pass requirements such as `requests` or `requests==2.31.0`"));
    }
    Ok(())
}

fn require_names(names: &[String], operation: &str) -> PipResult<()> {
    if names.is_empty() || names.iter().any(|s| s.trim().is_empty()) {
        return Err(ClassifiedError::new(
            ErrorKind::InvalidSpecification,
            format!("{operation} needs at least one package name"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockRunner, launch_error, output};
    use pipkit_core::{OsFamily, RunError};
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Config whose explicit pip path exists, so resolution never touches PATH.
    fn fixture() -> (TempDir, PipConfig) {
        let dir = TempDir::new().unwrap();
        let pip = dir.path().join("pip");
        std::fs::write(&pip, "").unwrap();
        let python = dir.path().join("python3");
        std::fs::write(&python, "").unwrap();
        let config = PipConfig {
            pip_path: Some(pip.display().to_string()),
            python_path: Some(python),
            ..PipConfig::default()
        };
        (dir, config)
    }

    fn manager(runner: MockRunner) -> PipManager {
        PipManager::new(Arc::new(runner)).with_locator(Locator::for_os(OsFamily::Linux))
    }

    #[tokio::test]
    async fn test_list_parses_json_and_passes_flags() {
        let (_dir, config) = fixture();
        let mut runner = MockRunner::new();
        runner
            .expect_run()
            .withf(|inv, _| {
                inv.args.starts_with(&["list".to_string(), "--format=json".to_string()])
                    && !inv.args.contains(&"--timeout".to_string())
            })
            .times(1)
            .returning(|_, _| Ok(output(r#"[{"name":"pip","version":"23.2.1"}]"#, 0)));

        let records = manager(runner)
            .list(&config, &ExecContext::new())
            .await
            .unwrap();
        assert_eq!(records, vec![PackageRecord::new("pip", Some("23.2.1".to_string()))]);
    }

    #[tokio::test]
    async fn test_network_operations_carry_timeout_and_retries() {
        let (_dir, mut config) = fixture();
        config.index_url = Some("https://mirror/simple".to_string());
        let mut runner = MockRunner::new();
        runner
            .expect_run()
            .withf(|inv, _| {
                let args = inv.args.join(" ");
                args.starts_with("install --upgrade requests")
                    && args.contains("--index-url https://mirror/simple")
                    && args.contains("--timeout 15 --retries 5")
                    && inv.timeout == Some(Duration::from_secs(900))
            })
            .times(1)
            .returning(|_, _| Ok(output("Successfully installed requests", 0)));

        let op = WriteOperation::Install {
            specs: vec!["requests".to_string()],
            upgrade: true,
            user: false,
            force_reinstall: false,
        };
        tokio_test::assert_ok!(manager(runner).write(&op, &config, &ExecContext::new()).await);
    }

    #[tokio::test]
    async fn test_index_url_only_reaches_network_operations() {
        let (_dir, config) = fixture();
        let config = config
            .with_overrides_from(|key| {
                (key == "PIPKIT_INDEX_URL").then(|| "https://pypi.org/simple".to_string())
            })
            .unwrap();
        let mut runner = MockRunner::new();
        runner
            .expect_run()
            .withf(|inv, _| inv.args[0] == "freeze")
            .times(1)
            .returning(|inv, _| {
                assert!(!inv.args.contains(&"--index-url".to_string()));
                Ok(output("requests==2.31.0\n", 0))
            });
        runner
            .expect_run()
            .withf(|inv, _| inv.args[0] == "list")
            .times(1)
            .returning(|inv, _| {
                assert!(inv.args.join(" ").contains("--outdated"));
                assert!(inv.args.join(" ").contains("--index-url https://pypi.org/simple"));
                Ok(output("[]", 0))
            });
        let pip = manager(runner);
        let ctx = ExecContext::new();

        let records = pip.freeze(&config, &ctx).await.unwrap();
        assert_eq!(records.len(), 1);

        let outdated = ReadOperation::List {
            outdated: true,
            editable_only: false,
        };
        tokio_test::assert_ok!(pip.read(&outdated, &config, &ctx).await);
    }

    #[tokio::test]
    async fn test_interpreter_launch_failure_is_runtime_not_found() {
        let (dir, config) = fixture();
        let mut runner = MockRunner::new();
        runner
            .expect_run()
            .returning(|_, _| Err(launch_error("python3")));

        let op = WriteOperation::CreateEnvironment {
            path: dir.path().join("venv"),
            with_pip: true,
        };
        let err = manager(runner)
            .write(&op, &config, &ExecContext::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RuntimeNotFound);
    }

    #[tokio::test]
    async fn test_pip_launch_failure_is_tool_not_installed() {
        let (_dir, config) = fixture();
        let mut runner = MockRunner::new();
        runner.expect_run().returning(|_, _| Err(launch_error("pip")));

        let err = manager(runner)
            .list(&config, &ExecContext::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ToolNotInstalled);
    }

    #[tokio::test]
    async fn test_failed_install_is_classified() {
        let (_dir, config) = fixture();
        let mut runner = MockRunner::new();
        runner.expect_run().returning(|_, _| {
            Ok(output(
                "ERROR: No matching distribution found for nopkg-xyz",
                1,
            ))
        });

        let err = manager(runner)
            .write(&WriteOperation::install(["nopkg-xyz"]), &config, &ExecContext::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PackageNotFound);
        assert_eq!(err.exit_code(), Some(1));
        assert!(err.command().unwrap().contains("install nopkg-xyz"));
    }

    #[tokio::test]
    async fn test_validation_happens_before_any_process() {
        let (dir, config) = fixture();
        let runner = MockRunner::new(); // any call would panic
        let pip = manager(runner);
        let ctx = ExecContext::new();

        let err = pip
            .write(&WriteOperation::install(Vec::<String>::new()), &config, &ctx)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSpecification);

        let err = pip
            .write(&WriteOperation::install(["  "]), &config, &ctx)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSpecification);

        let missing = WriteOperation::InstallRequirements {
            path: dir.path().join("requirements.txt"),
            upgrade: false,
        };
        let err = pip.write(&missing, &config, &ctx).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileNotFound);

        let project = WriteOperation::InstallProject {
            path: PathBuf::from("/definitely/not/here"),
            editable: true,
        };
        let err = pip.write(&project, &config, &ctx).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPath);

        std::fs::write(dir.path().join(VENV_MARKER), "").unwrap();
        let venv = WriteOperation::CreateEnvironment {
            path: dir.path().to_path_buf(),
            with_pip: true,
        };
        let err = pip.write(&venv, &config, &ctx).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EnvironmentAlreadyExists);

        let show = ReadOperation::Show {
            packages: Vec::new(),
            files: false,
        };
        let err = pip.read(&show, &config, &ctx).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSpecification);
    }

    #[tokio::test]
    async fn test_create_environment_uses_interpreter() {
        let (dir, config) = fixture();
        let target = dir.path().join("venv");
        let expected = target.display().to_string();
        let mut runner = MockRunner::new();
        runner
            .expect_run()
            .withf(move |inv, _| {
                inv.executable.program_path().ends_with("python3")
                    && inv.args == vec!["-m", "venv", "--without-pip", expected.as_str()]
            })
            .times(1)
            .returning(|_, _| Ok(output("", 0)));

        let op = WriteOperation::CreateEnvironment {
            path: target,
            with_pip: false,
        };
        tokio_test::assert_ok!(manager(runner).write(&op, &config, &ExecContext::new()).await);
    }

    #[tokio::test]
    async fn test_check_reports_problems_on_exit_one() {
        let (_dir, config) = fixture();
        let mut runner = MockRunner::new();
        runner.expect_run().returning(|_, _| {
            Ok(output(
                "flask 2.0.0 has requirement click>=7.1.2, but you have click 7.0.\n",
                1,
            ))
        });

        let result = manager(runner)
            .read(&ReadOperation::Check, &config, &ExecContext::new())
            .await
            .unwrap();
        assert!(matches!(result, ReadOutput::Problems(p) if p.len() == 1));
    }

    #[tokio::test]
    async fn test_version_parses_banner() {
        let (_dir, config) = fixture();
        let mut runner = MockRunner::new();
        runner.expect_run().returning(|_, _| {
            Ok(output(
                "pip 23.2.1 from /usr/lib/python3/dist-packages/pip (python 3.11)\n",
                0,
            ))
        });

        let version = manager(runner)
            .version(&config, &ExecContext::new())
            .await
            .unwrap();
        assert_eq!(version, "23.2.1");
    }

    #[tokio::test]
    async fn test_cancellation_surfaces_as_timeout_kind() {
        let (_dir, config) = fixture();
        let mut runner = MockRunner::new();
        runner.expect_run().returning(|_, _| {
            Err(RunError::Cancelled {
                output: String::new(),
                elapsed: Duration::from_millis(1),
            })
        });

        let err = manager(runner)
            .freeze(&config, &ExecContext::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert_eq!(err.context().get("reason").map(String::as_str), Some("cancelled"));
    }

    #[tokio::test]
    async fn test_show_missing_package() {
        let (_dir, config) = fixture();
        let mut runner = MockRunner::new();
        runner
            .expect_run()
            .returning(|_, _| Ok(output("WARNING: Package(s) not found: ghost\n", 1)));

        let err = manager(runner)
            .show("ghost", &config, &ExecContext::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PackageNotFound);
    }

    #[tokio::test]
    async fn test_install_skips_strategies_when_present() {
        let (_dir, config) = fixture();
        let mut runner = MockRunner::new();
        runner
            .expect_run()
            .withf(|inv, _| inv.args == vec!["--version"])
            .times(1)
            .returning(|_, _| Ok(output("pip 24.0 from /x (python 3.12)", 0)));

        let report = manager(runner)
            .install(&config, &ExecContext::new())
            .await
            .unwrap();
        assert!(report.was_already_installed());
    }
}
