//! Main commands enum.
//!
//! This module defines the available commands for the CLI tool.

use std::path::PathBuf;

use clap::Subcommand;

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Verify installed packages have compatible dependencies
    Check,

    /// Install pip if it is missing
    Bootstrap {
        /// Never download the bootstrap script
        #[arg(long)]
        offline: bool,
        /// Never prefix the system package manager with `sudo -n`
        #[arg(long)]
        no_sudo: bool,
    },

    /// Show the pip version and the Python it runs on
    Version,

    /// List installed packages
    List {
        /// Only packages with a newer release on the index
        #[arg(long)]
        outdated: bool,
        /// Only editable (development) installs
        #[arg(long)]
        editable: bool,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show details for one or more installed packages
    Show {
        /// Package names
        #[arg(required = true)]
        packages: Vec<String>,
        /// Also list installed files
        #[arg(short, long)]
        files: bool,
    },

    /// Print installed packages in requirements format
    Freeze {
        /// Include pip, setuptools and wheel
        #[arg(long)]
        all: bool,
    },

    /// Install packages
    Install {
        /// Requirement specifiers (e.g. "requests>=2.31")
        specs: Vec<String>,
        /// Install from a requirements file
        #[arg(short = 'r', long = "requirement", value_name = "FILE", conflicts_with = "editable")]
        requirement: Option<PathBuf>,
        /// Install a local project in editable mode
        #[arg(short = 'e', long, value_name = "DIR")]
        editable: Option<PathBuf>,
        /// Upgrade packages to the newest available version
        #[arg(short = 'U', long)]
        upgrade: bool,
        /// Install into the user site directory
        #[arg(long)]
        user: bool,
        /// Reinstall even if already up to date
        #[arg(long)]
        force_reinstall: bool,
    },

    /// Uninstall packages
    Uninstall {
        /// Package names
        #[arg(required = true)]
        packages: Vec<String>,
    },

    /// Download packages without installing them
    Download {
        /// Requirement specifiers
        #[arg(required = true)]
        specs: Vec<String>,
        /// Destination directory
        #[arg(short, long, default_value = ".")]
        dest: PathBuf,
    },

    /// Create a virtual environment
    Venv {
        /// Directory of the new environment
        path: PathBuf,
        /// Skip installing pip into the environment
        #[arg(long)]
        without_pip: bool,
    },

    /// Upgrade pip itself
    SelfUpgrade,
}

#[cfg(test)]
mod tests {
    use crate::parser::Cli;
    use clap::Parser;

    use super::*;

    #[test]
    fn test_install_flags() {
        let cli = Cli::parse_from(["pipkit", "install", "-U", "requests", "flask==3.0.0"]);
        let Some(Commands::Install { specs, upgrade, requirement, .. }) = cli.command else {
            panic!("expected install");
        };
        assert!(upgrade);
        assert!(requirement.is_none());
        assert_eq!(specs, ["requests", "flask==3.0.0"]);
    }

    #[test]
    fn test_install_requirements_file() {
        let cli = Cli::parse_from(["pipkit", "install", "-r", "requirements.txt"]);
        let Some(Commands::Install { specs, requirement, .. }) = cli.command else {
            panic!("expected install");
        };
        assert!(specs.is_empty());
        assert_eq!(requirement, Some(PathBuf::from("requirements.txt")));
    }

    #[test]
    fn test_show_requires_a_package() {
        assert!(Cli::try_parse_from(["pipkit", "show"]).is_err());
    }

    #[test]
    fn test_venv_without_pip() {
        let cli = Cli::parse_from(["pipkit", "venv", ".venv", "--without-pip"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Venv { without_pip: true, .. })
        ));
    }
}
