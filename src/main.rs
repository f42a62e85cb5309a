use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use credvault::cli::{Cli, Commands};
use credvault::commands::handle_add;
use credvault::{Config, Error};

fn init_tracing(debug: bool) {
    let default = if debug { "warn,credvault=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), Error> {
    let config = Config::load()?;

    match cli.command {
        Commands::Add {
            profile,
            env,
            add_config,
        } => handle_add(
            &config,
            cli.global.config_file.as_deref(),
            cli.global.keyring_service.as_deref(),
            &profile,
            env,
            add_config,
        ),
        Commands::Version => {
            println!("credvault {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.global.debug);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("credvault: {}", e);
            if e.is_partial_success() {
                eprintln!("credvault: the credentials were stored; only the step above failed");
            }
            ExitCode::FAILURE
        }
    }
}
