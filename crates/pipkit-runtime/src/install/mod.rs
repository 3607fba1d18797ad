//! pip installation via ordered, platform-specific fallback strategies.
//!
//! # Structure
//!
//! - `strategy` - The [`InstallStrategy`] trait and the [`InstallEnv`] it runs in
//! - `bootstrap` - `ensurepip` and the downloaded `get-pip.py` script
//! - `package_manager` - OS and third-party package managers
//! - `orchestrator` - Runs strategies in order until one succeeds

mod bootstrap;
mod orchestrator;
mod package_manager;
mod strategy;

pub use bootstrap::{BootstrapModule, RemoteBootstrapScript};
pub use orchestrator::{
    AttemptOutcome, InstallOrchestrator, InstallReport, InstallState, StrategyAttempt,
};
pub use package_manager::{LINUX_MANAGERS, ManagerCommand, PackageManagerStrategy};
pub use strategy::{InstallEnv, InstallStrategy, StrategyKind, Unavailable};
