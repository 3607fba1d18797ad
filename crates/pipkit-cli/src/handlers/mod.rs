//! Command handlers that delegate to [`PipManager`](pipkit_runtime::PipManager).
//!
//! Handlers follow the canonical pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<()>`
//! - Thin wrappers that:
//!   1. Turn CLI arguments into an engine operation
//!   2. Call the manager with the context's config and cancellation
//!   3. Format output for the terminal
//!
//! Handlers should NOT parse pip output or spawn processes.

pub mod bootstrap;
pub mod check;
pub mod freeze;
pub mod install;
pub mod list;
pub mod show;
pub mod uninstall;
pub mod venv;
pub mod version;
