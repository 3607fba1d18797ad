//! Output interpreters.
//!
//! Turn the text pip prints into typed records. Every parser is lenient:
//! empty input yields an empty result and lines it cannot understand are
//! skipped rather than failing the whole parse.

mod check;
mod freeze;
mod list;
mod show;
mod version;

pub use check::parse_check;
pub use freeze::parse_freeze;
pub use list::parse_list;
pub use show::{parse_show, parse_show_many};
pub use version::{ToolVersion, parse_version};

/// Lines pip prints around real output that carry no package data.
pub(crate) fn is_notice_line(line: &str) -> bool {
    const PREFIXES: &[&str] = &[
        "[notice]",
        "WARNING:",
        "ERROR:",
        "DEPRECATION:",
        "You are using pip version",
        "You should consider upgrading",
    ];
    let trimmed = line.trim_start();
    PREFIXES.iter().any(|prefix| trimmed.starts_with(prefix))
}
