//! Command-line adapter for pipkit.
//!
//! `main.rs` parses arguments, composes a [`CliContext`] through
//! [`bootstrap`] and dispatches to [`handlers`]. Everything here is
//! formatting and argument plumbing; pip itself is driven by
//! `pipkit-runtime`.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by the binary only
use dotenvy as _;
use tokio as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;

// Re-export primary types for convenient access
pub use bootstrap::{CliConfig, CliContext, bootstrap};
pub use commands::Commands;
pub use error::CliError;
pub use parser::Cli;
