//! Resolved executable references.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A resolved interpreter or pip executable.
///
/// Either a single program path, or an invocation template such as
/// `python3 -m pip` whose extra tokens are prepended to every argument list.
/// Only the program is checked during resolution; the leading arguments are
/// validated when the command actually runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExecutableRef {
    program: PathBuf,
    leading_args: Vec<String>,
}

impl ExecutableRef {
    /// A single program with no leading arguments.
    pub fn program(path: impl Into<PathBuf>) -> Self {
        Self {
            program: path.into(),
            leading_args: Vec::new(),
        }
    }

    /// A program followed by fixed leading arguments.
    pub fn with_args<I, S>(path: impl Into<PathBuf>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: path.into(),
            leading_args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a configured executable string.
    ///
    /// A string naming an existing file is taken whole, so paths containing
    /// spaces survive. Anything else is split on whitespace into a program
    /// and leading arguments. Returns `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        if Path::new(trimmed).is_file() {
            return Some(Self::program(trimmed));
        }
        let mut tokens = trimmed.split_whitespace();
        let program = tokens.next()?;
        Some(Self::with_args(program, tokens))
    }

    /// Same invocation with its program replaced (e.g. by a fully resolved path).
    #[must_use]
    pub fn with_program(&self, program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            leading_args: self.leading_args.clone(),
        }
    }

    pub fn program_path(&self) -> &Path {
        &self.program
    }

    pub fn leading_args(&self) -> &[String] {
        &self.leading_args
    }

    /// True for the launcher + module shape (`python -m pip`).
    pub fn is_template(&self) -> bool {
        !self.leading_args.is_empty()
    }

    /// Full argv for this executable followed by `args`.
    pub fn argv<S: AsRef<str>>(&self, args: &[S]) -> Vec<String> {
        let mut argv = Vec::with_capacity(1 + self.leading_args.len() + args.len());
        argv.push(self.program.display().to_string());
        argv.extend(self.leading_args.iter().cloned());
        argv.extend(args.iter().map(|a| a.as_ref().to_string()));
        argv
    }
}

impl fmt::Display for ExecutableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.leading_args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_template() {
        let exe = ExecutableRef::parse("python3 -m pip").unwrap();
        assert_eq!(exe.program_path(), Path::new("python3"));
        assert_eq!(exe.leading_args(), ["-m", "pip"]);
        assert!(exe.is_template());
        assert_eq!(exe.to_string(), "python3 -m pip");
    }

    #[test]
    fn test_parse_keeps_existing_path_with_spaces() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("my python");
        std::fs::write(&path, "").unwrap();

        let exe = ExecutableRef::parse(path.to_str().unwrap()).unwrap();
        assert_eq!(exe.program_path(), path.as_path());
        assert!(!exe.is_template());
    }

    #[test]
    fn test_parse_blank_is_none() {
        assert!(ExecutableRef::parse("   ").is_none());
    }

    #[test]
    fn test_argv_prepends_leading_args() {
        let exe = ExecutableRef::with_args("/usr/bin/python3", ["-m", "pip"]);
        assert_eq!(
            exe.argv(&["list", "--format=json"]),
            vec!["/usr/bin/python3", "-m", "pip", "list", "--format=json"]
        );
    }

    #[test]
    fn test_with_program_keeps_args() {
        let exe = ExecutableRef::parse("python -m pip")
            .unwrap()
            .with_program("/usr/bin/python");
        assert_eq!(exe.to_string(), "/usr/bin/python -m pip");
    }
}
