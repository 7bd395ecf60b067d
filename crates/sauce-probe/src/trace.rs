//! Step tracing
//!
//! Each page-object verb and each scenario checkpoint runs as a named step.
//! The trace keeps them in the order they started, with nesting depth,
//! duration and outcome, so a failed scenario can show the path that led to
//! the failure point.

use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

/// Status of a traced step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// Started, not finished
    Running,
    /// Finished without error
    Passed,
    /// Finished with an error
    Failed,
}

/// One traced step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Step title
    pub name: String,
    /// Nesting depth (0 = top level)
    pub depth: usize,
    /// Outcome
    pub status: StepStatus,
    /// Wall time in milliseconds
    pub duration_ms: u64,
    /// Error message for failed steps
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct TraceState {
    records: Vec<StepRecord>,
    open: Vec<(usize, Instant)>,
}

/// Ordered record of the steps taken in one session
#[derive(Debug, Default)]
pub struct StepTrace {
    state: Mutex<TraceState>,
}

impl StepTrace {
    /// Create an empty trace
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, TraceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Open a step and return its index
    pub fn begin(&self, name: &str) -> usize {
        let mut state = self.lock();
        let index = state.records.len();
        let depth = state.open.len();
        state.records.push(StepRecord {
            name: name.to_string(),
            depth,
            status: StepStatus::Running,
            duration_ms: 0,
            error: None,
        });
        state.open.push((index, Instant::now()));
        index
    }

    /// Close the step at `index`, and any steps still open inside it
    pub fn finish(&self, index: usize, error: Option<String>) {
        let mut state = self.lock();
        while let Some((open_index, started)) = state.open.pop() {
            let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
            if let Some(record) = state.records.get_mut(open_index) {
                record.duration_ms = duration_ms;
                if open_index == index {
                    record.status = if error.is_some() {
                        StepStatus::Failed
                    } else {
                        StepStatus::Passed
                    };
                    record.error = error;
                    break;
                }
                record.status = StepStatus::Failed;
            }
        }
    }

    /// Snapshot of all records
    #[must_use]
    pub fn records(&self) -> Vec<StepRecord> {
        self.lock().records.clone()
    }

    /// The innermost failed step, i.e. where the failure originated
    #[must_use]
    pub fn failed_step(&self) -> Option<StepRecord> {
        self.lock()
            .records
            .iter()
            .filter(|r| r.status == StepStatus::Failed)
            .max_by_key(|r| r.depth)
            .cloned()
    }

    /// Number of recorded steps
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    /// Whether nothing has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_steps_record_depth() {
        let trace = StepTrace::new();
        let outer = trace.begin("Login as standard user");
        let inner = trace.begin("Fill username");
        trace.finish(inner, None);
        trace.finish(outer, None);

        let records = trace.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].depth, 0);
        assert_eq!(records[1].depth, 1);
        assert!(records.iter().all(|r| r.status == StepStatus::Passed));
    }

    #[test]
    fn test_failed_step_is_innermost() {
        let trace = StepTrace::new();
        let outer = trace.begin("Filter products");
        let ok = trace.begin("Select product filter");
        trace.finish(ok, None);
        let bad = trace.begin("Get product names");
        trace.finish(bad, Some("timed out".into()));
        trace.finish(outer, Some("timed out".into()));

        let failed = trace.failed_step().unwrap_or_else(|| panic!("no failed step"));
        assert_eq!(failed.name, "Get product names");
        assert_eq!(failed.error.as_deref(), Some("timed out"));
    }

    #[test]
    fn test_finish_closes_abandoned_children() {
        let trace = StepTrace::new();
        let outer = trace.begin("outer");
        let _abandoned = trace.begin("inner");
        trace.finish(outer, None);

        let records = trace.records();
        assert_eq!(records[0].status, StepStatus::Passed);
        assert_eq!(records[1].status, StepStatus::Failed);
    }

    #[test]
    fn test_empty_trace() {
        let trace = StepTrace::new();
        assert!(trace.is_empty());
        assert!(trace.failed_step().is_none());
    }
}
