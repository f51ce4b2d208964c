//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};
use sl_core::Version;
use std::path::PathBuf;

/// SSDT Lifecycle - versioned deployment scripts for SQL database projects
#[derive(Parser, Debug)]
#[command(name = "sl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the .sqlproj file (default: the only one in the current directory)
    #[arg(short, long, global = true, env = "SL_PROJECT")]
    pub project: Option<PathBuf>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show, validate, or change the project configuration
    Config(ConfigArgs),

    /// Create the deployment script from a raw build script
    Generate(GenerateArgs),
}

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration as JSON
    Show,

    /// Report validation errors, exiting non-zero when there are any
    Validate,

    /// Change one field and save the configuration
    Set {
        /// Field name, e.g. versionPattern or track-dacpac-version
        field: String,

        /// New value; flags take true/false, an empty value clears optional text
        value: String,
    },

    /// Save the default configuration
    Reset,
}

/// Arguments for the generate command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Raw deployment script produced by the build
    #[arg(short, long)]
    pub script: PathBuf,

    /// Version of the freshly built DACPAC
    #[arg(short = 'n', long)]
    pub dac_version: Version,

    /// Previously deployed version (omit for a first deployment)
    #[arg(long)]
    pub previous: Option<Version>,

    /// SQL target name (default: project file name)
    #[arg(long)]
    pub target_name: Option<String>,

    /// Build output directory containing the DACPAC (default: bin/Release)
    #[arg(long)]
    pub binary_dir: Option<PathBuf>,

    /// Write to the latest directory instead of a versioned one
    #[arg(long)]
    pub latest: bool,

    /// Print the script instead of writing any files
    #[arg(long)]
    pub dry_run: bool,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
