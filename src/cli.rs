// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "depotpush")]
#[command(about = "Publish game builds to Steam depots with steamcmd")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: depotpush.yml in the current directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output for CI (only final result)
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Output JSON lines for scripting
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new depotpush.yml configuration file
    Init {
        /// Steam app ID to put in the template
        #[arg(long)]
        app_id: Option<String>,

        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },

    /// Write manifest.vdf and depot configs without uploading
    Generate,

    /// Generate manifests, log in to Steam and upload the build
    Deploy {
        /// Break an existing lock on the Steam config directory
        #[arg(short, long)]
        force: bool,

        /// Skip the login-only check before uploading
        #[arg(long)]
        skip_preflight: bool,
    },
}
