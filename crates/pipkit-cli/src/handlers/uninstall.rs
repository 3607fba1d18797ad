//! Uninstall command handler.

use anyhow::Result;
use pipkit_core::WriteOperation;

use crate::bootstrap::CliContext;

/// Execute the uninstall command.
pub async fn execute(ctx: &CliContext, packages: Vec<String>) -> Result<()> {
    let count = packages.len();
    let op = WriteOperation::Uninstall { packages };
    ctx.manager().write(&op, &ctx.config, &ctx.exec).await?;
    println!("Uninstalled {count} package(s).");
    Ok(())
}
