//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No `tokio::process` types in any signature
//! - Cancellation flows through [`ExecContext`](crate::ExecContext), never a global

pub mod command_runner;

pub use command_runner::{CommandRunner, RunError};
