//! Freeze command handler.

use anyhow::Result;
use pipkit_core::{ReadOperation, ReadOutput};

use crate::bootstrap::CliContext;
use crate::presentation::requirement_lines;

/// Execute the freeze command.
pub async fn execute(ctx: &CliContext, all: bool) -> Result<()> {
    let op = ReadOperation::Freeze { all };
    if let ReadOutput::Packages(records) = ctx.manager().read(&op, &ctx.config, &ctx.exec).await? {
        if !records.is_empty() {
            println!("{}", requirement_lines(&records));
        }
    }
    Ok(())
}
