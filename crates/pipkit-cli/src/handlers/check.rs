//! Check command handler.

use anyhow::Result;
use pipkit_core::{ReadOperation, ReadOutput};

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Execute the check command.
///
/// Prints each broken requirement and fails when there is at least one.
pub async fn execute(ctx: &CliContext) -> Result<()> {
    let output = ctx
        .manager()
        .read(&ReadOperation::Check, &ctx.config, &ctx.exec)
        .await?;
    let ReadOutput::Problems(problems) = output else {
        return Ok(());
    };

    if problems.is_empty() {
        println!("No broken requirements found.");
        return Ok(());
    }
    for problem in &problems {
        println!("{problem}");
    }
    Err(CliError::Problems(problems.len()).into())
}
