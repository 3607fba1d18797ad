//! Install, download and self-upgrade command handlers.

use std::path::PathBuf;

use anyhow::Result;
use pipkit_core::WriteOperation;
use tracing::info;

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Arguments for the install command.
#[derive(Debug, Default)]
pub struct InstallArgs {
    pub specs: Vec<String>,
    pub requirement: Option<PathBuf>,
    pub editable: Option<PathBuf>,
    pub upgrade: bool,
    pub user: bool,
    pub force_reinstall: bool,
}

impl InstallArgs {
    /// Engine operations in the order they run: requirements file or
    /// editable project first, then explicit specifiers.
    pub fn operations(self) -> Result<Vec<WriteOperation>, CliError> {
        let mut ops = Vec::new();
        if let Some(path) = self.requirement {
            ops.push(WriteOperation::InstallRequirements {
                path,
                upgrade: self.upgrade,
            });
        }
        if let Some(path) = self.editable {
            ops.push(WriteOperation::InstallProject {
                path,
                editable: true,
            });
        }
        if !self.specs.is_empty() {
            ops.push(WriteOperation::Install {
                specs: self.specs,
                upgrade: self.upgrade,
                user: self.user,
                force_reinstall: self.force_reinstall,
            });
        }
        if ops.is_empty() {
            return Err(CliError::Arguments(
                "nothing to install: pass specifiers, -r FILE or -e DIR".to_string(),
            ));
        }
        Ok(ops)
    }
}

/// Execute the install command.
pub async fn execute(ctx: &CliContext, args: InstallArgs) -> Result<()> {
    for op in args.operations()? {
        ctx.manager().write(&op, &ctx.config, &ctx.exec).await?;
    }
    println!("Installation complete.");
    Ok(())
}

/// Execute the download command.
pub async fn download(ctx: &CliContext, specs: Vec<String>, dest: PathBuf) -> Result<()> {
    let op = WriteOperation::Download {
        specs,
        dest: dest.clone(),
    };
    ctx.manager().write(&op, &ctx.config, &ctx.exec).await?;
    println!("Saved to {}", dest.display());
    Ok(())
}

/// Execute the self-upgrade command.
pub async fn self_upgrade(ctx: &CliContext) -> Result<()> {
    let before = ctx.manager().version(&ctx.config, &ctx.exec).await.ok();
    ctx.manager()
        .write(&WriteOperation::UpgradeTool, &ctx.config, &ctx.exec)
        .await?;
    let after = ctx.manager().version(&ctx.config, &ctx.exec).await?;

    match before {
        Some(before) if before != after => {
            info!("pip upgraded from {before} to {after}");
            println!("pip upgraded: {before} -> {after}");
        }
        _ => println!("pip {after} is up to date"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requirements_run_before_specs() {
        let args = InstallArgs {
            specs: vec!["requests".into()],
            requirement: Some(PathBuf::from("requirements.txt")),
            upgrade: true,
            ..InstallArgs::default()
        };
        let ops = args.operations().unwrap();
        assert_eq!(ops.len(), 2);
        assert!(matches!(
            &ops[0],
            WriteOperation::InstallRequirements { upgrade: true, .. }
        ));
        assert!(matches!(&ops[1], WriteOperation::Install { specs, .. } if specs == &["requests"]));
    }

    #[test]
    fn test_editable_project() {
        let args = InstallArgs {
            editable: Some(PathBuf::from(".")),
            ..InstallArgs::default()
        };
        let ops = args.operations().unwrap();
        assert!(matches!(
            &ops[..],
            [WriteOperation::InstallProject { editable: true, .. }]
        ));
    }

    #[test]
    fn test_nothing_to_install() {
        let err = InstallArgs::default().operations().unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
