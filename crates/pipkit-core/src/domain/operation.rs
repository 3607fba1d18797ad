//! Operations accepted by the pip manager.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{PackageDetail, PackageRecord};

/// Operations that only inspect the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum ReadOperation {
    List {
        outdated: bool,
        editable_only: bool,
    },
    Show {
        packages: Vec<String>,
        files: bool,
    },
    Freeze {
        all: bool,
    },
    /// Dependency consistency check (`pip check`).
    Check,
}

impl ReadOperation {
    /// Whether pip contacts the package index for this operation.
    pub const fn uses_network(&self) -> bool {
        matches!(self, Self::List { outdated: true, .. })
    }
}

/// Operations that change the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum WriteOperation {
    Install {
        specs: Vec<String>,
        upgrade: bool,
        user: bool,
        force_reinstall: bool,
    },
    InstallRequirements {
        path: PathBuf,
        upgrade: bool,
    },
    InstallProject {
        path: PathBuf,
        editable: bool,
    },
    Uninstall {
        packages: Vec<String>,
    },
    Download {
        specs: Vec<String>,
        dest: PathBuf,
    },
    /// Create a virtual environment with the resolved interpreter.
    CreateEnvironment {
        path: PathBuf,
        with_pip: bool,
    },
    /// Upgrade pip itself.
    UpgradeTool,
}

impl WriteOperation {
    /// Plain install of `specs` with every flag off.
    pub fn install<I, S>(specs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Install {
            specs: specs.into_iter().map(Into::into).collect(),
            upgrade: false,
            user: false,
            force_reinstall: false,
        }
    }

    pub const fn uses_network(&self) -> bool {
        !matches!(self, Self::Uninstall { .. } | Self::CreateEnvironment { .. })
    }

    /// Short name used in logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Install { .. } => "install",
            Self::InstallRequirements { .. } => "install-requirements",
            Self::InstallProject { .. } => "install-project",
            Self::Uninstall { .. } => "uninstall",
            Self::Download { .. } => "download",
            Self::CreateEnvironment { .. } => "create-environment",
            Self::UpgradeTool => "upgrade-tool",
        }
    }
}

/// Result of a [`ReadOperation`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReadOutput {
    Packages(Vec<PackageRecord>),
    Details(Vec<PackageDetail>),
    /// `pip check` problems; empty when the environment is consistent.
    Problems(Vec<String>),
}
