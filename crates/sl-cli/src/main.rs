//! SSDT Lifecycle CLI - versioned deployment script generation

use clap::Parser;

mod cli;
mod commands;
mod logger;

use cli::Cli;
use commands::common::ExitCode;
use commands::{config, generate};

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    logger::init(cli.global.verbose);

    let result = match &cli.command {
        cli::Commands::Config(args) => config::execute(args, &cli.global).await,
        cli::Commands::Generate(args) => generate::execute(args, &cli.global).await,
    };

    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<ExitCode>() {
            Some(ExitCode(code)) => std::process::ExitCode::from(*code),
            None => {
                eprintln!("Error: {err:#}");
                std::process::ExitCode::FAILURE
            }
        },
    }
}
