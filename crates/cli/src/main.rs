//! CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use probe_cli::bootstrap::{self, ConfigOverrides};
use probe_cli::{Cli, Commands, DebugCommand, handlers};
use tracing::error;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn dispatch(cli: Cli) -> anyhow::Result<bool> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::List => {
            let config = bootstrap::load(config_path, &ConfigOverrides::default()).await?;
            handlers::list::execute(&config);
            Ok(true)
        }
        Commands::Run(args) => {
            let overrides = ConfigOverrides {
                jsonplaceholder_url: args.jsonplaceholder_url.clone(),
                reqres_url: args.reqres_url.clone(),
                timeout_ms: args.timeout_ms,
                report_dir: args.report_dir.clone(),
            };
            let config = bootstrap::load(config_path, &overrides).await?;
            handlers::run::execute(&config, &args).await
        }
        Commands::Manifest { full, minimal } => {
            handlers::manifest::execute(&full, minimal.as_deref()).await
        }
        Commands::Debug(DebugCommand::Reqres) => {
            let config = bootstrap::load(config_path, &ConfigOverrides::default()).await?;
            handlers::debug::execute(&config).await?;
            Ok(true)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match dispatch(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
