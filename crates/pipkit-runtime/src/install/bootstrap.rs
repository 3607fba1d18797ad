//! Strategies that install pip with the interpreter itself.

use std::io::Write;
use std::path::PathBuf;

use async_trait::async_trait;
use pipkit_core::{ClassifiedError, ErrorKind, ExecContext};
use tracing::{debug, info};

use super::strategy::{InstallEnv, InstallStrategy, StrategyKind, Unavailable};

// ============================================================================
// Bootstrap module (ensurepip)
// ============================================================================

/// `python -m ensurepip --upgrade`, bundled with most CPython builds.
#[derive(Debug, Clone, Copy, Default)]
pub struct BootstrapModule;

#[async_trait]
impl InstallStrategy for BootstrapModule {
    fn name(&self) -> &str {
        StrategyKind::BootstrapModule.as_str()
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::BootstrapModule
    }

    async fn check(&self, env: &InstallEnv<'_>, ctx: &ExecContext) -> Result<(), Unavailable> {
        let runtime = env.require_runtime()?;
        let version_check = env
            .invocation(runtime.clone())
            .args(["-m", "ensurepip", "--version"]);
        match env.run_raw(&version_check, ctx, ErrorKind::RuntimeNotFound).await {
            Ok(output) if output.success() => Ok(()),
            Ok(output) => Err(Unavailable::new(format!(
                "ensurepip is not available (exit code {})",
                output.exit_code
            ))),
            Err(e) => Err(Unavailable::new(e.message().to_string())),
        }
    }

    async fn install(
        &self,
        env: &InstallEnv<'_>,
        ctx: &ExecContext,
    ) -> Result<(), ClassifiedError> {
        let runtime = env
            .require_runtime()
            .map_err(|e| ClassifiedError::new(ErrorKind::RuntimeNotFound, e.reason))?;
        let invocation = env
            .invocation(runtime.clone())
            .args(["-m", "ensurepip", "--upgrade"]);
        env.run(&invocation, ctx, ErrorKind::RuntimeNotFound).await?;
        Ok(())
    }
}

// ============================================================================
// Remote bootstrap script (get-pip.py)
// ============================================================================

/// Download `get-pip.py` and run it with the interpreter.
#[derive(Debug, Clone, Default)]
pub struct RemoteBootstrapScript {
    /// Where the script is written; the system temp dir when unset.
    script_dir: Option<PathBuf>,
}

impl RemoteBootstrapScript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the downloaded script into `dir` instead of the system temp dir.
    #[must_use]
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            script_dir: Some(dir.into()),
        }
    }

    async fn download(
        &self,
        env: &InstallEnv<'_>,
        ctx: &ExecContext,
    ) -> Result<tempfile::NamedTempFile, ClassifiedError> {
        let url = env.config.bootstrap_url.as_str();
        info!("Downloading pip bootstrap script from {url}");

        let client = reqwest::Client::builder()
            .timeout(env.config.network_timeout)
            .build()
            .map_err(|e| network_error(url, e))?;

        let fetch = async {
            let response = client
                .get(url)
                .send()
                .await
                .map_err(|e| network_error(url, e))?;
            if !response.status().is_success() {
                return Err(ClassifiedError::new(
                    ErrorKind::NetworkError,
                    format!("Download failed: HTTP {}", response.status()),
                )
                .with_context("url", url));
            }
            response.bytes().await.map_err(|e| network_error(url, e))
        };

        let body = tokio::select! {
            biased;
            () = ctx.token().cancelled() => {
                return Err(ClassifiedError::new(ErrorKind::Timeout, "Bootstrap script download cancelled")
                    .with_context("reason", "cancelled")
                    .with_context("url", url));
            }
            body = fetch => body?,
        };
        debug!(bytes = body.len(), "Bootstrap script downloaded");

        let mut builder = tempfile::Builder::new();
        builder.prefix("get-pip-").suffix(".py");
        let mut file = match &self.script_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(|e| file_error("create", e))?;
        file.write_all(&body).map_err(|e| file_error("write", e))?;
        file.flush().map_err(|e| file_error("write", e))?;
        Ok(file)
    }
}

#[async_trait]
impl InstallStrategy for RemoteBootstrapScript {
    fn name(&self) -> &str {
        StrategyKind::RemoteBootstrapScript.as_str()
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::RemoteBootstrapScript
    }

    async fn check(&self, env: &InstallEnv<'_>, _ctx: &ExecContext) -> Result<(), Unavailable> {
        if !env.config.allow_network_bootstrap {
            return Err(Unavailable::disabled("network bootstrap is disabled"));
        }
        env.require_runtime().map(|_| ())
    }

    async fn install(
        &self,
        env: &InstallEnv<'_>,
        ctx: &ExecContext,
    ) -> Result<(), ClassifiedError> {
        let runtime = env
            .require_runtime()
            .map_err(|e| ClassifiedError::new(ErrorKind::RuntimeNotFound, e.reason))?;

        // Removed when `script` drops, on every return path.
        let script = self.download(env, ctx).await?;
        let invocation = env
            .invocation(runtime.clone())
            .arg(script.path().display().to_string())
            .arg("--no-warn-script-location");
        env.run(&invocation, ctx, ErrorKind::RuntimeNotFound).await?;
        Ok(())
    }
}

fn network_error(url: &str, err: reqwest::Error) -> ClassifiedError {
    let (kind, reason) = if err.is_timeout() {
        (ErrorKind::Timeout, Some("deadline"))
    } else {
        (ErrorKind::NetworkError, None)
    };
    let mut classified = ClassifiedError::new(kind, format!("Failed to download {url}: {err}"))
        .with_context("url", url)
        .with_suggestion("Check your network connection and proxy settings")
        .with_cause(err);
    if let Some(reason) = reason {
        classified = classified.with_context("reason", reason);
    }
    classified
}

fn file_error(action: &str, err: std::io::Error) -> ClassifiedError {
    let kind = if err.kind() == std::io::ErrorKind::PermissionDenied {
        ErrorKind::PermissionDenied
    } else {
        ErrorKind::CommandFailed
    };
    ClassifiedError::new(
        kind,
        format!("Failed to {action} temporary bootstrap script: {err}"),
    )
    .with_cause(err)
}
