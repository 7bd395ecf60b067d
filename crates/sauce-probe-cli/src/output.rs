//! Report and listing output

use crate::config::Verbosity;
use crate::error::{CliError, CliResult};
use console::{style, Style, Term};
use sauce_probe::{RunReport, ScenarioReport, ScenarioStatus, StepRecord, StepStatus, Suite, TagFilter};
use std::fmt::Write as _;
use std::time::Duration;

/// Renders run reports and suite listings
#[derive(Debug)]
pub struct ReportPrinter {
    term: Term,
    /// Whether to use colors
    pub use_color: bool,
    /// Output level
    pub verbosity: Verbosity,
}

impl ReportPrinter {
    /// Create a printer writing to stdout
    #[must_use]
    pub fn new(use_color: bool, verbosity: Verbosity) -> Self {
        Self {
            term: Term::stdout(),
            use_color,
            verbosity,
        }
    }

    /// Print the text report
    ///
    /// # Errors
    ///
    /// Returns an I/O error if stdout is closed.
    pub fn print_report(&self, report: &RunReport) -> CliResult<()> {
        self.term
            .write_str(&render_report(report, self.use_color, self.verbosity))?;
        Ok(())
    }

    /// Print the JSON report
    ///
    /// # Errors
    ///
    /// Returns a report error if serialization fails, or an I/O error.
    pub fn print_json(&self, report: &RunReport) -> CliResult<()> {
        self.term.write_line(&render_json(report)?)?;
        Ok(())
    }

    /// Print the selected scenarios
    ///
    /// # Errors
    ///
    /// Returns an I/O error if stdout is closed.
    pub fn print_listing(&self, suites: &[Suite], filter: &TagFilter) -> CliResult<()> {
        self.term.write_str(&render_listing(suites, filter))?;
        Ok(())
    }
}

fn seconds(duration: Duration) -> String {
    format!("{:.2}s", duration.as_secs_f64())
}

fn status_mark(status: ScenarioStatus, use_color: bool) -> String {
    match (status, use_color) {
        (ScenarioStatus::Passed, true) => style("✓").green().bold().to_string(),
        (ScenarioStatus::Failed, true) => style("✗").red().bold().to_string(),
        (ScenarioStatus::Skipped, true) => style("-").yellow().to_string(),
        (ScenarioStatus::Passed, false) => "PASS".to_string(),
        (ScenarioStatus::Failed, false) => "FAIL".to_string(),
        (ScenarioStatus::Skipped, false) => "SKIP".to_string(),
    }
}

fn step_mark(status: StepStatus) -> &'static str {
    match status {
        StepStatus::Passed => "✓",
        StepStatus::Failed => "✗",
        StepStatus::Running => "…",
    }
}

fn render_steps(out: &mut String, steps: &[StepRecord], use_color: bool) {
    for step in steps {
        let indent = "  ".repeat(step.depth + 3);
        let line = format!("{indent}{} {} ({}ms)", step_mark(step.status), step.name, step.duration_ms);
        let line = if use_color && step.status == StepStatus::Failed {
            style(line).red().to_string()
        } else if use_color {
            style(line).dim().to_string()
        } else {
            line
        };
        let _ = writeln!(out, "{line}");
    }
}

fn render_scenario(out: &mut String, scenario: &ScenarioReport, use_color: bool, verbosity: Verbosity) {
    if verbosity.is_quiet() && !scenario.status.is_failed() {
        return;
    }
    let tags: Vec<String> = scenario.tags.iter().map(ToString::to_string).collect();
    let _ = writeln!(
        out,
        "  {} {} [{}] ({})",
        status_mark(scenario.status, use_color),
        scenario.name,
        tags.join(" "),
        seconds(scenario.duration())
    );

    if scenario.status.is_failed() || verbosity.is_verbose() {
        render_steps(out, &scenario.steps, use_color);
    }
    if let Some(error) = &scenario.error {
        if let Some(step) = &scenario.failed_step {
            let _ = writeln!(out, "      Failed step: {step}");
        }
        let _ = writeln!(out, "      Error: {error}");
    }
}

/// Text rendering of a run: pass/fail per scenario, step trace up to the failure
#[must_use]
pub fn render_report(report: &RunReport, use_color: bool, verbosity: Verbosity) -> String {
    let mut out = String::new();
    for suite in &report.suites {
        if suite.scenarios.is_empty() {
            continue;
        }
        if !verbosity.is_quiet() {
            let title = if use_color {
                style(&suite.name).bold().underlined().to_string()
            } else {
                format!("=== {} ===", suite.name)
            };
            let _ = writeln!(out, "{title}");
        }
        for scenario in &suite.scenarios {
            render_scenario(&mut out, scenario, use_color, verbosity);
        }
    }

    let (passed, failed, skipped) = (
        report.passed_count(),
        report.failed_count(),
        report.skipped_count(),
    );
    let duration = seconds(Duration::from_millis(report.duration_ms));
    let status = if failed > 0 { "FAILED" } else { "PASSED" };
    let status = if use_color {
        let paint = if failed > 0 {
            Style::new().red().bold()
        } else {
            Style::new().green().bold()
        };
        paint.apply_to(status).to_string()
    } else {
        status.to_string()
    };
    let _ = writeln!(
        out,
        "\n{status} {} scenarios in {duration} ({passed} passed, {failed} failed, {skipped} skipped)",
        report.total()
    );
    out
}

/// Pretty JSON rendering of a run
///
/// # Errors
///
/// Returns a report generation error if serialization fails.
pub fn render_json(report: &RunReport) -> CliResult<String> {
    report
        .to_json()
        .map_err(|e| CliError::report_generation(e.to_string()))
}

/// Suites and the scenarios `filter` selects, with their tags
#[must_use]
pub fn render_listing(suites: &[Suite], filter: &TagFilter) -> String {
    let mut out = String::new();
    for suite in suites {
        let selected = suite.select(filter);
        if selected.is_empty() {
            continue;
        }
        let hook = if suite.before_each.is_some() {
            " (before each: login)"
        } else {
            ""
        };
        let _ = writeln!(out, "{}{hook}", suite.name);
        for scenario in selected {
            let tags: Vec<String> = scenario.tags.iter().map(ToString::to_string).collect();
            let _ = writeln!(out, "  {} [{}]", scenario.name, tags.join(" "));
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use sauce_probe::{suites, SuiteReport, Tag};

    fn scenario(name: &str, status: ScenarioStatus) -> ScenarioReport {
        let mut report = ScenarioReport::skipped("Login", name, vec![Tag::Login]);
        report.status = status;
        report.duration_ms = 1500;
        report
    }

    fn failing() -> ScenarioReport {
        let mut report = scenario("Login as locked out user", ScenarioStatus::Failed);
        report.error = Some("text of [data-test=\"error\"]: expected \"x\", got \"y\"".to_string());
        report.failed_step = Some("Check error message".to_string());
        report.steps = vec![
            StepRecord {
                name: "Login as locked_out_user".to_string(),
                depth: 0,
                status: StepStatus::Passed,
                duration_ms: 40,
                error: None,
            },
            StepRecord {
                name: "Check error message".to_string(),
                depth: 0,
                status: StepStatus::Failed,
                duration_ms: 5000,
                error: report.error.clone(),
            },
        ];
        report
    }

    fn run(scenarios: Vec<ScenarioReport>) -> RunReport {
        RunReport::new(
            chrono::Utc::now(),
            Duration::from_secs(3),
            vec![SuiteReport {
                name: "Login".to_string(),
                scenarios,
            }],
        )
    }

    mod report_tests {
        use super::*;

        #[test]
        fn test_passing_run() {
            let report = run(vec![scenario("Login with invalid password", ScenarioStatus::Passed)]);
            let text = render_report(&report, false, Verbosity::Normal);
            assert!(text.contains("=== Login ==="));
            assert!(text.contains("PASS Login with invalid password [@login] (1.50s)"));
            assert!(text.contains("PASSED 1 scenarios in 3.00s (1 passed, 0 failed, 0 skipped)"));
            assert!(!text.contains("Error:"));
        }

        #[test]
        fn test_failure_shows_trace() {
            let report = run(vec![failing()]);
            let text = render_report(&report, false, Verbosity::Normal);
            assert!(text.contains("FAIL Login as locked out user"));
            assert!(text.contains("✓ Login as locked_out_user (40ms)"));
            assert!(text.contains("✗ Check error message (5000ms)"));
            assert!(text.contains("Failed step: Check error message"));
            assert!(text.contains("FAILED 1 scenarios"));
        }

        #[test]
        fn test_quiet_hides_passes() {
            let report = run(vec![
                scenario("Login with invalid password", ScenarioStatus::Passed),
                failing(),
            ]);
            let text = render_report(&report, false, Verbosity::Quiet);
            assert!(!text.contains("Login with invalid password"));
            assert!(text.contains("Login as locked out user"));
            assert!(!text.contains("=== Login ==="));
        }

        #[test]
        fn test_json_keeps_failure_details() {
            let json = render_json(&run(vec![failing()])).unwrap();
            let value: serde_json::Value = serde_json::from_str(&json).unwrap();
            let scenario = &value["suites"][0]["scenarios"][0];
            assert_eq!(scenario["status"], "failed");
            assert_eq!(scenario["failed_step"], "Check error message");
            assert_eq!(scenario["tags"][0], "login");
            assert_eq!(scenario["steps"].as_array().unwrap().len(), 2);
        }
    }

    mod listing_tests {
        use super::*;

        #[test]
        fn test_listing_all() {
            let text = render_listing(&suites::all(), &TagFilter::all());
            assert!(text.contains("Apply Filters (before each: login)"));
            assert!(text.contains("  Filter Products by Name - Z to A [@purchase @filter @name]"));
            assert!(text.contains("Login\n"));
            assert_eq!(text.lines().count(), 9);
        }

        #[test]
        fn test_listing_filtered() {
            let filter = TagFilter::all().with_include([Tag::Cart]);
            let text = render_listing(&suites::all(), &filter);
            assert_eq!(text, "Add item and checkout (before each: login)\n  Add items to the Cart [@purchase @cart]\n");
        }
    }
}
