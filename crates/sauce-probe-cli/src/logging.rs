//! Logging initialization using the `tracing` crate.
//!
//! `RUST_LOG` wins when set; otherwise the filter follows the verbosity
//! flags. Logs go to stderr so stdout stays clean for reports.

use crate::config::{LogFormat, Verbosity};
use crate::error::{CliError, CliResult};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber
///
/// # Errors
///
/// Returns a configuration error if a subscriber is already installed.
pub fn init(verbosity: Verbosity, format: LogFormat) -> CliResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.default_filter()));

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match format {
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .compact(),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .json()
                    .with_current_span(true),
            )
            .try_init(),
    };
    installed.map_err(|e| CliError::config(format!("logging: {e}")))
}
