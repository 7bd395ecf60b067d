//! CLI command definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use sauce_probe::Tag;
use std::path::PathBuf;

/// Sauce Probe: end-to-end checks for the SauceDemo storefront
#[derive(Parser, Debug)]
#[command(name = "sauce-probe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (only failures and the summary)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Log line format
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormatArg,

    /// Subcommand to run (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the suites against a browser
    Run(RunArgs),

    /// List suites, scenarios and their tags
    List(ListArgs),
}

/// Scenario selection shared by `run` and `list`
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Only scenarios carrying one of these tags (e.g. `@login`)
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<Tag>,

    /// Skip scenarios carrying any of these tags
    #[arg(long = "exclude-tag", value_name = "TAG")]
    pub exclude_tags: Vec<Tag>,

    /// Only these suites, by name
    #[arg(long = "suite", value_name = "NAME")]
    pub suites: Vec<String>,
}

/// Arguments for the run command
#[derive(Parser, Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct RunArgs {
    /// Scenario selection
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Scenarios in flight at once
    #[arg(short = 'j', long, default_value = "1", env = "SAUCE_PROBE_WORKERS")]
    pub workers: usize,

    /// Element wait and assertion timeout in milliseconds
    #[arg(long, default_value = "5000")]
    pub timeout_ms: u64,

    /// Polling interval in milliseconds
    #[arg(long, default_value = "50")]
    pub poll_ms: u64,

    /// Page load timeout in milliseconds
    #[arg(long, default_value = "30000")]
    pub navigation_timeout_ms: u64,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Disable the chromium sandbox (containers/CI)
    #[arg(long)]
    pub no_sandbox: bool,

    /// Path to the chromium binary
    #[arg(long, env = "CHROMIUM_PATH")]
    pub chromium_path: Option<PathBuf>,

    /// Storefront root URL
    #[arg(long, default_value = sauce_probe::DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Stop scheduling scenarios after the first failure
    #[arg(long)]
    pub fail_fast: bool,

    /// Report format on stdout
    #[arg(short, long, default_value = "text")]
    pub format: ReportFormat,

    /// Also write the JSON report to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Read credentials from this env file instead of `.env`
    #[arg(long)]
    pub env_file: Option<PathBuf>,
}

impl RunArgs {
    /// Defaults used when no subcommand is given (environment still applies)
    ///
    /// # Errors
    ///
    /// Returns a clap error if an environment-provided value is invalid.
    pub fn from_defaults() -> Result<Self, clap::Error> {
        Self::try_parse_from(["run"])
    }
}

/// Arguments for the list command
#[derive(Parser, Debug, Clone)]
pub struct ListArgs {
    /// Scenario selection
    #[command(flatten)]
    pub selection: SelectionArgs,
}

/// Report format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON
    Json,
}

/// Log line format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormatArg {
    /// Compact text
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Color choice argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorArg {
    /// Use colors when stdout is a terminal
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
