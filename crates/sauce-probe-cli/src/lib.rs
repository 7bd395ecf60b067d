//! Sauce Probe CLI library
//!
//! Argument parsing, logging setup, run orchestration and report rendering
//! for the `sauce-probe` binary.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
pub mod logging;
mod output;
mod runner;

pub use commands::{
    Cli, ColorArg, Commands, ListArgs, LogFormatArg, ReportFormat, RunArgs, SelectionArgs,
};
pub use config::{CliConfig, ColorChoice, LogFormat, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{render_json, render_listing, render_report, ReportPrinter};
pub use runner::{
    browser_config, list, load_environment, run, runner_config, select, session_settings,
    Selection,
};
