//! `tokio::process` implementation of the [`CommandRunner`] port.

use std::io;
use std::process::{ExitStatus, Stdio};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use pipkit_core::{
    CommandInvocation, CommandOutput, CommandRunner, ExecContext, RunError, SIGNALLED_EXIT_CODE,
};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// How long to wait for the output pipes to close after the child was killed.
/// Grandchildren that inherited the pipes can keep them open indefinitely.
const DRAIN_GRACE: Duration = Duration::from_secs(2);

/// Runs commands as child processes with captured output.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioCommandRunner;

impl TokioCommandRunner {
    pub const fn new() -> Self {
        Self
    }
}

enum Outcome {
    Exited(io::Result<ExitStatus>),
    Cancelled,
    TimedOut,
}

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(
        &self,
        invocation: &CommandInvocation,
        ctx: &ExecContext,
    ) -> Result<CommandOutput, RunError> {
        let started = Instant::now();
        if ctx.is_cancelled() {
            return Err(RunError::Cancelled {
                output: String::new(),
                elapsed: Duration::ZERO,
            });
        }

        let program = invocation.executable.program_path();
        debug!(command = %invocation, "Running command");

        let mut child = Command::new(program)
            .args(invocation.executable.leading_args())
            .args(&invocation.args)
            .envs(&invocation.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RunError::Launch {
                program: program.display().to_string(),
                source,
            })?;

        let mut stdout = spawn_reader(child.stdout.take());
        let mut stderr = spawn_reader(child.stderr.take());

        let deadline = ctx.deadline_for(invocation);
        let outcome = tokio::select! {
            biased;
            () = ctx.token().cancelled() => Outcome::Cancelled,
            () = sleep_or_pending(deadline) => Outcome::TimedOut,
            status = child.wait() => Outcome::Exited(status),
        };

        let status = match outcome {
            Outcome::Exited(status) => status?,
            stopped => {
                if let Err(e) = child.kill().await {
                    warn!("Failed to kill {}: {e}", program.display());
                }
                let (output, _) =
                    drain(&mut stdout, &mut stderr, tokio::time::sleep(DRAIN_GRACE)).await;
                let elapsed = started.elapsed();
                return Err(if matches!(stopped, Outcome::Cancelled) {
                    debug!(command = %invocation, ?elapsed, "Command cancelled");
                    RunError::Cancelled { output, elapsed }
                } else {
                    debug!(command = %invocation, ?elapsed, "Command timed out");
                    RunError::TimedOut { output, elapsed }
                });
            }
        };

        // A descendant that inherited the pipes can hold them open after the
        // child exits; stop reading at the deadline or on cancellation.
        let remaining = deadline.map(|d| d.saturating_sub(started.elapsed()));
        let stop = async {
            tokio::select! {
                () = ctx.token().cancelled() => {}
                () = sleep_or_pending(remaining) => {}
            }
        };
        let (output, closed) = drain(&mut stdout, &mut stderr, stop).await;
        if !closed {
            warn!(command = %invocation, "Output pipes still open after exit, returning output read so far");
        }
        let exit_code = status.code().unwrap_or(SIGNALLED_EXIT_CODE);
        let duration = started.elapsed();
        debug!(command = %invocation, exit_code, ?duration, "Command finished");

        Ok(CommandOutput {
            output,
            exit_code,
            duration,
        })
    }
}

/// A pipe being read into a buffer the caller can take at any time.
struct PipeReader {
    buf: Arc<Mutex<Vec<u8>>>,
    task: JoinHandle<()>,
}

impl PipeReader {
    fn take(&self) -> Vec<u8> {
        std::mem::take(&mut *self.buf.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

fn spawn_reader<R>(pipe: Option<R>) -> PipeReader
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let buf = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&buf);
    let task = tokio::spawn(async move {
        let Some(mut pipe) = pipe else {
            return;
        };
        let mut chunk = [0u8; 8192];
        loop {
            match pipe.read(&mut chunk).await {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    sink.lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .extend_from_slice(&chunk[..n]);
                }
            }
        }
    });
    PipeReader { buf, task }
}

async fn sleep_or_pending(deadline: Option<Duration>) {
    match deadline {
        Some(duration) => tokio::time::sleep(duration).await,
        None => std::future::pending().await,
    }
}

/// Read both pipes to EOF or until `stop` completes, whichever is first.
///
/// Returns stdout followed by stderr, and whether both pipes closed.
async fn drain(
    stdout: &mut PipeReader,
    stderr: &mut PipeReader,
    stop: impl Future<Output = ()>,
) -> (String, bool) {
    let closed = tokio::select! {
        () = async {
            let _ = (&mut stdout.task).await;
            let _ = (&mut stderr.task).await;
        } => true,
        () = stop => false,
    };
    if !closed {
        stdout.task.abort();
        stderr.task.abort();
    }

    let stdout = stdout.take();
    let stderr = stderr.take();
    let mut combined = String::from_utf8_lossy(&stdout).into_owned();
    if !stderr.is_empty() {
        if !combined.is_empty() && !combined.ends_with('\n') {
            combined.push('\n');
        }
        combined.push_str(&String::from_utf8_lossy(&stderr));
    }
    (combined, closed)
}
