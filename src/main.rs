//! svcctl binary
//!
//! Runs the bundled service server under the lifecycle controller.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use svcctl::lifecycle::{Controller, RunOptions, DEFAULT_CONFIG_PATH};
use svcctl::server::ServiceServer;

#[derive(Parser)]
#[command(name = "svcctl")]
#[command(about = "Lifecycle controller for long-running services")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the service until it stops or a shutdown signal arrives
    Run(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Redirect log output to this file; empty keeps the console
    #[arg(short, long)]
    log: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

impl From<RunArgs> for RunOptions {
    fn from(args: RunArgs) -> Self {
        Self {
            config: args.config,
            log: args.log.filter(|path| !path.is_empty()).map(PathBuf::from),
            debug: args.debug,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => Controller::new(args.into())
            .run::<ServiceServer>()
            .await
            .into(),
    }
}
