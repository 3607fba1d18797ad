//! List command handler.

use anyhow::Result;
use pipkit_core::{ReadOperation, ReadOutput};

use crate::bootstrap::CliContext;
use crate::presentation::package_table;

/// Execute the list command.
///
/// Prints a table, or the records as JSON with `json`.
pub async fn execute(ctx: &CliContext, outdated: bool, editable: bool, json: bool) -> Result<()> {
    let op = ReadOperation::List {
        outdated,
        editable_only: editable,
    };
    let ReadOutput::Packages(records) = ctx.manager().read(&op, &ctx.config, &ctx.exec).await?
    else {
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else if records.is_empty() {
        if outdated {
            println!("All packages are up to date.");
        } else {
            println!("No packages found.");
        }
    } else {
        println!("{}", package_table(&records));
    }
    Ok(())
}
