//! Strategies that delegate to a system or third-party package manager.

use async_trait::async_trait;
use pipkit_core::{ClassifiedError, ErrorKind, ExecContext, ExecutableRef};
use tracing::{debug, info};

use super::strategy::{InstallEnv, InstallStrategy, StrategyKind, Unavailable};
use crate::locate::find_command;

/// A package manager command line that installs pip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagerCommand {
    pub program: &'static str,
    pub args: &'static [&'static str],
    /// Needs root; prefixed with `sudo -n` when allowed.
    pub privileged: bool,
}

/// Linux package managers, tried in this order.
pub const LINUX_MANAGERS: &[ManagerCommand] = &[
    ManagerCommand {
        program: "apt-get",
        args: &["install", "-y", "python3-pip"],
        privileged: true,
    },
    ManagerCommand {
        program: "dnf",
        args: &["install", "-y", "python3-pip"],
        privileged: true,
    },
    ManagerCommand {
        program: "yum",
        args: &["install", "-y", "python3-pip"],
        privileged: true,
    },
    ManagerCommand {
        program: "pacman",
        args: &["-S", "--noconfirm", "python-pip"],
        privileged: true,
    },
    ManagerCommand {
        program: "zypper",
        args: &["--non-interactive", "install", "python3-pip"],
        privileged: true,
    },
    ManagerCommand {
        program: "apk",
        args: &["add", "py3-pip"],
        privileged: true,
    },
];

pub const HOMEBREW: ManagerCommand = ManagerCommand {
    program: "brew",
    args: &["install", "python"],
    privileged: false,
};

pub const CHOCOLATEY: ManagerCommand = ManagerCommand {
    program: "choco",
    args: &["install", "python", "-y"],
    privileged: false,
};

pub const SCOOP: ManagerCommand = ManagerCommand {
    program: "scoop",
    args: &["install", "python"],
    privileged: false,
};

/// Installs pip through the first available manager of an ordered list.
#[derive(Debug, Clone)]
pub struct PackageManagerStrategy {
    name: &'static str,
    kind: StrategyKind,
    managers: &'static [ManagerCommand],
}

impl PackageManagerStrategy {
    /// The host's native package manager (first found of the Linux list).
    pub const fn linux() -> Self {
        Self {
            name: "os-package-manager",
            kind: StrategyKind::OsPackageManager,
            managers: LINUX_MANAGERS,
        }
    }

    pub const fn homebrew() -> Self {
        Self {
            name: "homebrew",
            kind: StrategyKind::OsPackageManager,
            managers: &[HOMEBREW],
        }
    }

    pub const fn chocolatey() -> Self {
        Self {
            name: "chocolatey",
            kind: StrategyKind::ThirdPartyPackageManager,
            managers: &[CHOCOLATEY],
        }
    }

    pub const fn scoop() -> Self {
        Self {
            name: "scoop",
            kind: StrategyKind::ThirdPartyPackageManager,
            managers: &[SCOOP],
        }
    }

    /// First manager whose program is on the search path.
    fn detect(&self, env: &InstallEnv<'_>) -> Option<(ManagerCommand, ExecutableRef)> {
        self.managers.iter().find_map(|manager| {
            find_command(manager.program, env.config)
                .map(|path| (*manager, ExecutableRef::program(path)))
        })
    }

    /// Full command, with `sudo -n` in front when the manager needs root.
    fn command(
        env: &InstallEnv<'_>,
        manager: ManagerCommand,
        program: ExecutableRef,
    ) -> ExecutableRef {
        if manager.privileged && env.config.use_sudo {
            if let Some(sudo) = find_command("sudo", env.config) {
                let mut args = vec!["-n".to_string(), program.program_path().display().to_string()];
                args.extend(manager.args.iter().map(ToString::to_string));
                return ExecutableRef::with_args(sudo, args);
            }
            debug!("sudo not found, running {} directly", manager.program);
        }
        ExecutableRef::with_args(
            program.program_path(),
            manager.args.iter().map(ToString::to_string),
        )
    }
}

#[async_trait]
impl InstallStrategy for PackageManagerStrategy {
    fn name(&self) -> &str {
        self.name
    }

    fn kind(&self) -> StrategyKind {
        self.kind
    }

    async fn check(&self, env: &InstallEnv<'_>, _ctx: &ExecContext) -> Result<(), Unavailable> {
        if self.detect(env).is_some() {
            Ok(())
        } else {
            let names: Vec<&str> = self.managers.iter().map(|m| m.program).collect();
            Err(Unavailable::new(format!(
                "no package manager found (tried: {})",
                names.join(", ")
            )))
        }
    }

    async fn install(
        &self,
        env: &InstallEnv<'_>,
        ctx: &ExecContext,
    ) -> Result<(), ClassifiedError> {
        let Some((manager, program)) = self.detect(env) else {
            return Err(ClassifiedError::new(
                ErrorKind::UnsupportedPlatform,
                format!("{} is not available", self.name),
            ));
        };
        info!("Installing pip with {}", manager.program);
        let invocation = env.invocation(Self::command(env, manager, program));
        env.run(&invocation, ctx, ErrorKind::UnsupportedPlatform)
            .await
            .map(|_| ())
            .map_err(|e| e.with_context("package_manager", manager.program))
    }
}
