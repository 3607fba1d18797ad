//! Shared fixtures for unit tests.

use std::time::Duration;

use async_trait::async_trait;
use mockall::mock;
use pipkit_core::{CommandInvocation, CommandOutput, CommandRunner, ExecContext, RunError};

mock! {
    pub Runner {}

    #[async_trait]
    impl CommandRunner for Runner {
        async fn run(
            &self,
            invocation: &CommandInvocation,
            ctx: &ExecContext,
        ) -> Result<CommandOutput, RunError>;
    }
}

pub fn output(text: &str, exit_code: i32) -> CommandOutput {
    CommandOutput {
        output: text.to_string(),
        exit_code,
        duration: Duration::from_millis(10),
    }
}

pub fn launch_error(program: &str) -> RunError {
    RunError::Launch {
        program: program.to_string(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
    }
}

/// Write an executable shell script named `name` into `dir`.
#[cfg(unix)]
pub fn fake_executable(dir: &std::path::Path, name: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}
