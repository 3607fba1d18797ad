//! Venv command handler.

use std::path::PathBuf;

use anyhow::Result;
use pipkit_core::WriteOperation;
use pipkit_core::config::venv_scripts_dir;

use crate::bootstrap::CliContext;

/// Execute the venv command.
///
/// Creates the environment and prints how to use it with `--venv`.
pub async fn execute(ctx: &CliContext, path: PathBuf, without_pip: bool) -> Result<()> {
    let op = WriteOperation::CreateEnvironment {
        path: path.clone(),
        with_pip: !without_pip,
    };
    ctx.manager().write(&op, &ctx.config, &ctx.exec).await?;

    println!("Created virtual environment at {}", path.display());
    println!("  scripts: {}", venv_scripts_dir(&path).display());
    println!("  use it with: pipkit --venv {} <command>", path.display());
    Ok(())
}
