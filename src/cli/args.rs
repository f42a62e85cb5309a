//! CLI argument parsing structures.

use clap::{Args, Parser};
use std::path::PathBuf;

use super::commands::Commands;

/// Main CLI structure for credvault.
#[derive(Parser, Debug)]
#[command(name = "credvault")]
#[command(about = "Store long-lived AWS credentials in the OS keychain", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands.
#[derive(Debug, Default, Args)]
pub struct GlobalArgs {
    /// Show debugging output
    #[arg(long, global = true)]
    pub debug: bool,

    /// AWS config file to read and register profiles in (default: $AWS_CONFIG_FILE or ~/.aws/config)
    #[arg(long, global = true, value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    /// Keychain service name credentials are stored under
    #[arg(long, global = true, value_name = "NAME")]
    pub keyring_service: Option<String>,
}
