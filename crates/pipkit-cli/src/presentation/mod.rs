//! Shared CLI presentation utilities.
//!
//! Functions here return strings; handlers decide where they are printed.
//!
//! # Guidelines
//!
//! - Keep this module format-only: no engine calls
//! - Parsing of pip output belongs in `pipkit-core`

pub mod packages;
pub mod tables;

pub use packages::{detail_block, install_report, package_table, requirement_lines};
pub use tables::{format_optional, separator, truncate_string};
