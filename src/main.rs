// ABOUTME: Entry point for the depotpush CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use depotpush::action::ActionOutputs;
use depotpush::config;
use depotpush::error::Result;
use depotpush::output::{Output, OutputMode};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over the verbose flag when set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };

    if let Err(e) = run(cli, mode).await {
        Output::new(mode).error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, mode: OutputMode) -> Result<()> {
    let cwd = env::current_dir()?;
    let output = Output::new(mode);

    match cli.command {
        Commands::Init { app_id, force } => {
            config::init_config(&cwd, app_id.as_deref(), force)?;
            output.success(&format!("Created {}", config::CONFIG_FILENAME));
            Ok(())
        }
        Commands::Generate => {
            let config = commands::load_config(cli.config.as_deref(), &cwd)?;
            commands::generate(config, &cwd, &ActionOutputs::from_env(), output).await
        }
        Commands::Deploy {
            force,
            skip_preflight,
        } => {
            let config = commands::load_config(cli.config.as_deref(), &cwd)?;
            let flags = commands::DeployFlags {
                force,
                skip_preflight,
            };
            commands::deploy(config, &cwd, flags, &ActionOutputs::from_env(), output).await
        }
    }
}
