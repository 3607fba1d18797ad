//! Bootstrap command handler.
//!
//! Installs pip through the platform's fallback strategies.

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::presentation::install_report;

/// Execute the bootstrap command.
///
/// `offline` disables the remote bootstrap script; `no_sudo` keeps the
/// system package manager from being run through `sudo -n`.
pub async fn execute(ctx: &CliContext, offline: bool, no_sudo: bool) -> Result<()> {
    let mut config = ctx.config.clone();
    if offline {
        config.allow_network_bootstrap = false;
    }
    if no_sudo {
        config.use_sudo = false;
    }

    let report = ctx.manager().install(&config, &ctx.exec).await?;
    println!("{}", install_report(&report));
    Ok(())
}
