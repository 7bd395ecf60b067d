//! Run reports.
//!
//! One [`ScenarioReport`] per scheduled scenario, grouped by suite into a
//! [`RunReport`]. Reports are plain data: the CLI renders them as text or
//! writes them as JSON.

use crate::harness::Tag;
use crate::result::E2eResult;
use crate::trace::StepRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use uuid::Uuid;

/// Outcome of a scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioStatus {
    /// Every step succeeded
    Passed,
    /// A step failed, or the session could not be opened
    Failed,
    /// Not run because an earlier scenario failed under fail-fast
    Skipped,
}

impl ScenarioStatus {
    /// Check if status is passing
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Check if status is failing
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

/// Result of one scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioReport {
    /// Suite the scenario belongs to
    pub suite: String,
    /// Scenario title
    pub name: String,
    /// Scenario tags
    pub tags: Vec<Tag>,
    /// Outcome
    pub status: ScenarioStatus,
    /// Wall time in milliseconds
    pub duration_ms: u64,
    /// First error, for failed scenarios
    pub error: Option<String>,
    /// Innermost step that failed
    pub failed_step: Option<String>,
    /// Every step taken, in order
    pub steps: Vec<StepRecord>,
}

impl ScenarioReport {
    /// A scenario that was not run
    #[must_use]
    pub fn skipped(suite: impl Into<String>, name: impl Into<String>, tags: Vec<Tag>) -> Self {
        Self {
            suite: suite.into(),
            name: name.into(),
            tags,
            status: ScenarioStatus::Skipped,
            duration_ms: 0,
            error: None,
            failed_step: None,
            steps: Vec::new(),
        }
    }

    /// Duration as a [`Duration`]
    #[must_use]
    pub const fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Results of one suite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Suite name
    pub name: String,
    /// Scenario results, in declaration order
    pub scenarios: Vec<ScenarioReport>,
}

impl SuiteReport {
    fn count(&self, status: ScenarioStatus) -> usize {
        self.scenarios.iter().filter(|s| s.status == status).count()
    }

    /// Count passed scenarios
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.count(ScenarioStatus::Passed)
    }

    /// Count failed scenarios
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count(ScenarioStatus::Failed)
    }

    /// Count skipped scenarios
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count(ScenarioStatus::Skipped)
    }

    /// Check if no scenario failed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed_count() == 0
    }

    /// Failed scenarios
    #[must_use]
    pub fn failures(&self) -> Vec<&ScenarioReport> {
        self.scenarios
            .iter()
            .filter(|s| s.status.is_failed())
            .collect()
    }
}

/// Results of a whole run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Unique id of the run
    pub run_id: Uuid,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Wall time in milliseconds
    pub duration_ms: u64,
    /// Per-suite results
    pub suites: Vec<SuiteReport>,
}

impl RunReport {
    /// Create a report for a run that started at `started_at`
    #[must_use]
    pub fn new(started_at: DateTime<Utc>, duration: Duration, suites: Vec<SuiteReport>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at,
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            suites,
        }
    }

    /// Every scenario report
    pub fn scenarios(&self) -> impl Iterator<Item = &ScenarioReport> {
        self.suites.iter().flat_map(|s| s.scenarios.iter())
    }

    /// Total scenarios scheduled
    #[must_use]
    pub fn total(&self) -> usize {
        self.scenarios().count()
    }

    /// Count passed scenarios
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.suites.iter().map(SuiteReport::passed_count).sum()
    }

    /// Count failed scenarios
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.suites.iter().map(SuiteReport::failed_count).sum()
    }

    /// Count skipped scenarios
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.suites.iter().map(SuiteReport::skipped_count).sum()
    }

    /// Check if no scenario failed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.suites.iter().all(SuiteReport::all_passed)
    }

    /// Serialize to pretty JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> E2eResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write pretty JSON to `path`
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_json(&self, path: &Path) -> E2eResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::trace::StepStatus;

    fn report(name: &str, status: ScenarioStatus) -> ScenarioReport {
        ScenarioReport {
            suite: "Apply Filters".to_string(),
            name: name.to_string(),
            tags: vec![Tag::Purchase, Tag::Filter],
            status,
            duration_ms: 120,
            error: status.is_failed().then(|| "boom".to_string()),
            failed_step: status.is_failed().then(|| "Get product names".to_string()),
            steps: vec![StepRecord {
                name: "Get product names".to_string(),
                depth: 0,
                status: if status.is_failed() {
                    StepStatus::Failed
                } else {
                    StepStatus::Passed
                },
                duration_ms: 100,
                error: None,
            }],
        }
    }

    fn run() -> RunReport {
        RunReport::new(
            Utc::now(),
            Duration::from_millis(250),
            vec![
                SuiteReport {
                    name: "Apply Filters".to_string(),
                    scenarios: vec![
                        report("a", ScenarioStatus::Passed),
                        report("b", ScenarioStatus::Failed),
                    ],
                },
                SuiteReport {
                    name: "Login".to_string(),
                    scenarios: vec![ScenarioReport::skipped("Login", "c", vec![Tag::Login])],
                },
            ],
        )
    }

    #[test]
    fn test_counts() {
        let run = run();
        assert_eq!(run.total(), 3);
        assert_eq!(run.passed_count(), 1);
        assert_eq!(run.failed_count(), 1);
        assert_eq!(run.skipped_count(), 1);
        assert!(!run.all_passed());
        assert_eq!(run.suites[0].failures()[0].name, "b");
        assert!(run.suites[1].all_passed());
    }

    #[test]
    fn test_json_shape() {
        let run = run();
        let json: serde_json::Value = serde_json::from_str(&run.to_json().unwrap()).unwrap();
        let scenario = &json["suites"][0]["scenarios"][1];
        assert_eq!(scenario["status"], "failed");
        assert_eq!(scenario["tags"], serde_json::json!(["purchase", "filter"]));
        assert_eq!(scenario["steps"][0]["status"], "failed");
        assert_eq!(json["duration_ms"], 250);
    }

    #[test]
    fn test_json_round_trip_and_file() {
        let run = run();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        run.write_json(&path).unwrap();
        let back: RunReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, run);
    }

    #[test]
    fn test_empty_run_passes() {
        let run = RunReport::new(Utc::now(), Duration::ZERO, Vec::new());
        assert!(run.all_passed());
        assert_eq!(run.total(), 0);
    }
}
