//! Sauce Probe: end-to-end checks for the SauceDemo storefront
//!
//! ## Usage
//!
//! ```bash
//! sauce-probe                              # Run every suite
//! sauce-probe run --tag filter -j 2        # Sorting scenarios, two at a time
//! sauce-probe run --format json -o out.json
//! sauce-probe list --tag login             # Show what would run
//! ```

use clap::Parser;
use sauce_probe_cli::{logging, Cli, CliConfig, CliResult, Commands, RunArgs};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<bool> {
    let cli = Cli::parse();
    let config = CliConfig::from_cli(&cli);
    logging::init(config.verbosity, config.log_format)?;

    match cli.command {
        None => {
            let args = RunArgs::from_defaults().unwrap_or_else(|e| e.exit());
            sauce_probe_cli::run(&config, &args)
        }
        Some(Commands::Run(args)) => sauce_probe_cli::run(&config, &args),
        Some(Commands::List(args)) => {
            sauce_probe_cli::list(&config, &args)?;
            Ok(true)
        }
    }
}
