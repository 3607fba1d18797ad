//! `pip --version` banner.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static PIP_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^pip\s+(?P<pip>\S+)(?:\s+from\s+(?P<location>.+?))?(?:\s+\(python\s+(?P<python>[^)]+)\))?\s*$")
        .expect("pip version pattern")
});

/// Parsed `pip --version` banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolVersion {
    pub pip: String,
    pub location: Option<String>,
    pub python: Option<String>,
}

impl fmt::Display for ToolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pip {}", self.pip)?;
        if let Some(python) = &self.python {
            write!(f, " (python {python})")?;
        }
        Ok(())
    }
}

/// Parse `pip X.Y.Z from <location> (python A.B)`.
///
/// Only the first matching line is used, so leading warnings are ignored.
pub fn parse_version(output: &str) -> Option<ToolVersion> {
    output.lines().map(str::trim).find_map(|line| {
        let caps = PIP_VERSION.captures(line)?;
        Some(ToolVersion {
            pip: caps["pip"].to_string(),
            location: caps.name("location").map(|m| m.as_str().to_string()),
            python: caps.name("python").map(|m| m.as_str().to_string()),
        })
    })
}
