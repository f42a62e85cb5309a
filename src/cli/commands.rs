//! Command and subcommand definitions.

use clap::{ArgAction, Subcommand};

/// Top-level commands available in credvault.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add credentials, prompting if none are provided
    Add {
        /// Name of the profile
        profile: String,

        /// Read the credentials from AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY
        #[arg(long)]
        env: bool,

        /// Don't add the profile to the AWS config file if it is missing
        #[arg(long = "no-add-config", action = ArgAction::SetFalse)]
        add_config: bool,
    },
    /// Print version information
    Version,
}
