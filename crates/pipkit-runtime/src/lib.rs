//! Process-backed implementation of pipkit's operations.
//!
//! This crate supplies the pieces that touch the host system:
//!
//! - [`TokioCommandRunner`] - spawns commands with cancellation and deadlines
//! - [`Locator`] - resolves the interpreter and pip executables
//! - [`install`] - ordered strategies that install pip when it is missing
//! - [`PipManager`] - the operation surface tying the above to the
//!   interpreters and classifier in `pipkit-core`

#![deny(unsafe_code)]

pub mod install;
pub mod locate;
mod manager;
mod runner;
#[cfg(test)]
mod test_support;

pub use install::{InstallOrchestrator, InstallReport, InstallState, InstallStrategy};
pub use locate::{LocateError, Locator};
pub use manager::PipManager;
pub use runner::TokioCommandRunner;
