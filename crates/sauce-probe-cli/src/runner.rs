//! Command execution
//!
//! Selection and credentials are checked before chromium is launched, so a
//! bad `--suite` or a missing variable fails fast without a browser.

use crate::commands::{ListArgs, ReportFormat, RunArgs, SelectionArgs};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::ReportPrinter;
use sauce_probe::{
    suites, BrowserConfig, Environment, RunReport, RunnerConfig, SessionSettings, SiteUrls, Suite,
    TagFilter, WaitPolicy,
};
use std::time::Duration;
use tracing::{info, warn};

/// Suites and tag filter picked by the selection flags
#[derive(Debug)]
pub struct Selection {
    /// Suites in run order
    pub suites: Vec<Suite>,
    /// Tag include/exclude filter
    pub filter: TagFilter,
}

impl Selection {
    /// Number of scenarios that will run
    #[must_use]
    pub fn scenario_count(&self) -> usize {
        self.suites
            .iter()
            .map(|suite| suite.select(&self.filter).len())
            .sum()
    }
}

/// Resolve `--suite`, `--tag` and `--exclude-tag`
///
/// # Errors
///
/// Returns an invalid argument error for an unknown suite name.
pub fn select(args: &SelectionArgs) -> CliResult<Selection> {
    let filter = TagFilter::all()
        .with_include(args.tags.iter().copied())
        .with_exclude(args.exclude_tags.iter().copied());

    if args.suites.is_empty() {
        return Ok(Selection {
            suites: suites::all(),
            filter,
        });
    }

    let known = suites::all();
    if let Some(unknown) = args
        .suites
        .iter()
        .find(|name| !known.iter().any(|s| s.name.eq_ignore_ascii_case(name)))
    {
        let names: Vec<&str> = known.iter().map(|s| s.name.as_str()).collect();
        return Err(CliError::invalid_argument(format!(
            "unknown suite {unknown:?} (known: {})",
            names.join(", ")
        )));
    }

    Ok(Selection {
        suites: suites::named(&args.suites),
        filter,
    })
}

/// Credentials from `--env-file`, or from the environment and `.env`
///
/// # Errors
///
/// Returns the library's missing-environment error.
pub fn load_environment(args: &RunArgs) -> CliResult<Environment> {
    let environment = match &args.env_file {
        Some(path) => Environment::from_env_file(path)?,
        None => Environment::load()?,
    };
    Ok(environment)
}

/// Session settings from the timing and URL flags
#[must_use]
pub fn session_settings(args: &RunArgs) -> SessionSettings {
    SessionSettings::default()
        .with_wait(WaitPolicy::from_millis(args.timeout_ms, args.poll_ms))
        .with_navigation_timeout(Duration::from_millis(args.navigation_timeout_ms))
        .with_urls(SiteUrls::new(args.base_url.as_str()))
}

/// Runner settings from the scheduling flags
#[must_use]
pub fn runner_config(args: &RunArgs, filter: TagFilter) -> RunnerConfig {
    let config = RunnerConfig::default()
        .with_workers(args.workers)
        .with_filter(filter);
    if args.fail_fast {
        config.with_fail_fast()
    } else {
        config
    }
}

/// Browser settings from the chromium flags
#[must_use]
pub fn browser_config(args: &RunArgs) -> BrowserConfig {
    let mut config = BrowserConfig::default().with_headless(!args.headed);
    if let Some(path) = &args.chromium_path {
        config = config.with_chromium_path(path.to_string_lossy());
    }
    if args.no_sandbox {
        config = config.with_no_sandbox();
    }
    config
}

/// Run the selected scenarios; `Ok(true)` when none failed
///
/// # Errors
///
/// Returns selection, environment, browser launch or report output errors.
/// Scenario failures are not errors: they show up in the report.
pub fn run(config: &CliConfig, args: &RunArgs) -> CliResult<bool> {
    let selection = select(&args.selection)?;
    if selection.scenario_count() == 0 {
        return Err(CliError::invalid_argument("no scenarios match the selection"));
    }
    let environment = load_environment(args)?;

    let report = execute(args, &selection, environment)?;

    if let Some(path) = &args.output {
        report.write_json(path)?;
        info!(path = %path.display(), "report written");
    }
    let printer = ReportPrinter::new(config.color.should_color(), config.verbosity);
    match args.format {
        ReportFormat::Text => printer.print_report(&report)?,
        ReportFormat::Json => printer.print_json(&report)?,
    }

    if !report.all_passed() {
        warn!(failed = report.failed_count(), "run failed");
    }
    Ok(report.all_passed())
}

#[cfg(feature = "browser")]
fn execute(args: &RunArgs, selection: &Selection, environment: Environment) -> CliResult<RunReport> {
    use sauce_probe::{CdpBrowser, CdpSessionFactory, SuiteRunner};

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let browser = CdpBrowser::launch(browser_config(args)).await?;
        let factory = CdpSessionFactory::new(browser, session_settings(args));
        let runner = SuiteRunner::new(
            factory,
            environment,
            runner_config(args, selection.filter.clone()),
        );
        let report = runner.run_all(&selection.suites).await;
        if let Err(e) = runner.factory().browser().close().await {
            warn!(error = %e, "browser did not shut down cleanly");
        }
        Ok::<_, CliError>(report)
    })
}

#[cfg(not(feature = "browser"))]
fn execute(_args: &RunArgs, _selection: &Selection, _environment: Environment) -> CliResult<RunReport> {
    Err(CliError::config(
        "browser support not compiled in. Rebuild with --features browser",
    ))
}

/// Print the suites and scenarios a selection would run
///
/// # Errors
///
/// Returns an invalid argument error for an unknown suite name.
pub fn list(config: &CliConfig, args: &ListArgs) -> CliResult<()> {
    let selection = select(&args.selection)?;
    ReportPrinter::new(config.color.should_color(), config.verbosity)
        .print_listing(&selection.suites, &selection.filter)
}
