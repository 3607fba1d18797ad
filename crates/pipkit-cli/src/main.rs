//! CLI entry point - the composition root.
//!
//! Sets up logging and Ctrl-C cancellation, composes the [`CliContext`]
//! and routes each command to its handler.

use clap::{CommandFactory, Parser};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use pipkit_cli::handlers::install::InstallArgs;
use pipkit_cli::{Cli, CliConfig, CliContext, Commands, bootstrap, error, handlers};

fn init_tracing(verbose: bool) {
    // RUST_LOG wins; otherwise warnings only, or debug with --verbose.
    let fallback = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .ok();
}

async fn dispatch(ctx: &CliContext, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Check => handlers::check::execute(ctx).await,
        Commands::Bootstrap { offline, no_sudo } => {
            handlers::bootstrap::execute(ctx, offline, no_sudo).await
        }
        Commands::Version => handlers::version::execute(ctx).await,
        Commands::List {
            outdated,
            editable,
            json,
        } => handlers::list::execute(ctx, outdated, editable, json).await,
        Commands::Show { packages, files } => handlers::show::execute(ctx, packages, files).await,
        Commands::Freeze { all } => handlers::freeze::execute(ctx, all).await,
        Commands::Install {
            specs,
            requirement,
            editable,
            upgrade,
            user,
            force_reinstall,
        } => {
            let args = InstallArgs {
                specs,
                requirement,
                editable,
                upgrade,
                user,
                force_reinstall,
            };
            handlers::install::execute(ctx, args).await
        }
        Commands::Uninstall { packages } => handlers::uninstall::execute(ctx, packages).await,
        Commands::Download { specs, dest } => handlers::install::download(ctx, specs, dest).await,
        Commands::Venv { path, without_pip } => {
            handlers::venv::execute(ctx, path, without_pip).await
        }
        Commands::SelfUpgrade => handlers::install::self_upgrade(ctx).await,
    }
}

async fn run(mut cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command.take() else {
        // No command provided - show help
        Cli::command().print_help()?;
        return Ok(());
    };

    let ctx = bootstrap(&CliConfig::from_cli(&cli))?;

    // Ctrl-C cancels whatever command is running; the runner kills the child.
    let token = ctx.exec.token().clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Interrupt received, cancelling");
            token.cancel();
        }
    });

    dispatch(&ctx, command).await
}

#[tokio::main]
async fn main() {
    // Load PIPKIT_* variables from a local .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        std::process::exit(error::report(&err));
    }
}
