//! Version command handler.

use anyhow::Result;

use crate::bootstrap::CliContext;

/// Execute the version command.
pub async fn execute(ctx: &CliContext) -> Result<()> {
    let version = ctx.manager().version_info(&ctx.config, &ctx.exec).await?;
    println!("{version}");
    if let Some(location) = &version.location {
        println!("  from {location}");
    }
    Ok(())
}
