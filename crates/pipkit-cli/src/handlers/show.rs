//! Show command handler.

use anyhow::Result;
use pipkit_core::{ClassifiedError, ErrorKind, ReadOperation, ReadOutput};

use crate::bootstrap::CliContext;
use crate::presentation::detail_block;

/// Execute the show command.
///
/// Packages pip knows nothing about are reported after the found ones.
pub async fn execute(ctx: &CliContext, packages: Vec<String>, files: bool) -> Result<()> {
    let op = ReadOperation::Show {
        packages: packages.clone(),
        files,
    };
    let ReadOutput::Details(details) = ctx.manager().read(&op, &ctx.config, &ctx.exec).await?
    else {
        return Ok(());
    };

    let blocks: Vec<String> = details.iter().map(detail_block).collect();
    if !blocks.is_empty() {
        println!("{}", blocks.join("\n---\n"));
    }

    let missing: Vec<&String> = packages
        .iter()
        .filter(|name| !details.iter().any(|d| d.name.eq_ignore_ascii_case(name)))
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    let names: Vec<&str> = missing.iter().map(|s| s.as_str()).collect();
    Err(ClassifiedError::new(
        ErrorKind::PackageNotFound,
        format!("Package(s) not found: {}", names.join(", ")),
    )
    .into())
}
