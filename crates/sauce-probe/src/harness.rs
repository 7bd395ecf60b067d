//! Scenario harness: tags, suites and the runner.
//!
//! A [`Suite`] is an ordered list of [`Scenario`]s with an optional
//! `before_each` hook. Every scenario gets its own [`Session`] from a
//! [`SessionFactory`], its own [`Fixture`], and runs as a linear script: the
//! first error ends it. Nothing is aggregated or retried.
//!
//! The runner keeps up to `workers` scenarios in flight on the current task
//! and reports them in declaration order.

use crate::config::Environment;
use crate::fixture::Fixture;
use crate::reporter::{RunReport, ScenarioReport, ScenarioStatus, SuiteReport};
use crate::result::E2eResult;
use crate::session::Session;
use async_trait::async_trait;
use chrono::Utc;
use futures::future::BoxFuture;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use thiserror::Error;
use tracing::{info, info_span, warn, Instrument};

// =============================================================================
// TAGS
// =============================================================================

/// Scenario tag used for selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    /// Buying flow
    Purchase,
    /// Product sorting
    Filter,
    /// Ordering by name
    Name,
    /// Ordering by price
    Price,
    /// Cart contents
    Cart,
    /// Checkout flow
    Checkout,
    /// Authentication
    Login,
}

impl Tag {
    /// Every tag
    pub const ALL: [Self; 7] = [
        Self::Purchase,
        Self::Filter,
        Self::Name,
        Self::Price,
        Self::Cart,
        Self::Checkout,
        Self::Login,
    ];

    /// Tag name without the `@`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Purchase => "purchase",
            Self::Filter => "filter",
            Self::Name => "name",
            Self::Price => "price",
            Self::Cart => "cart",
            Self::Checkout => "checkout",
            Self::Login => "login",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.as_str())
    }
}

/// Unknown tag name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tag {0:?} (expected one of: purchase, filter, name, price, cart, checkout, login)")]
pub struct ParseTagError(pub String);

impl FromStr for Tag {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let name = name.strip_prefix('@').unwrap_or(name);
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| ParseTagError(s.to_string()))
    }
}

/// Include/exclude selection by tag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter {
    /// Run scenarios with any of these tags (all, when empty)
    pub include: Vec<Tag>,
    /// Never run scenarios with any of these tags
    pub exclude: Vec<Tag>,
}

impl TagFilter {
    /// Select everything
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Require one of `tags`
    #[must_use]
    pub fn with_include(mut self, tags: impl IntoIterator<Item = Tag>) -> Self {
        self.include.extend(tags);
        self
    }

    /// Reject any of `tags`
    #[must_use]
    pub fn with_exclude(mut self, tags: impl IntoIterator<Item = Tag>) -> Self {
        self.exclude.extend(tags);
        self
    }

    /// Whether a scenario tagged `tags` is selected
    #[must_use]
    pub fn matches(&self, tags: &[Tag]) -> bool {
        let included = self.include.is_empty() || tags.iter().any(|t| self.include.contains(t));
        included && !tags.iter().any(|t| self.exclude.contains(t))
    }
}

// =============================================================================
// SCENARIOS AND SUITES
// =============================================================================

/// Body of a scenario or hook
pub type ScenarioFn =
    for<'a> fn(&'a Fixture<'a>, &'a Environment) -> BoxFuture<'a, E2eResult<()>>;

/// A named, tagged script
#[derive(Clone)]
pub struct Scenario {
    /// Title
    pub name: String,
    /// Tags for selection
    pub tags: Vec<Tag>,
    /// Script
    pub body: ScenarioFn,
}

impl fmt::Debug for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.name)
            .field("tags", &self.tags)
            .finish_non_exhaustive()
    }
}

impl Scenario {
    /// Create a scenario
    #[must_use]
    pub fn new(name: impl Into<String>, tags: &[Tag], body: ScenarioFn) -> Self {
        Self {
            name: name.into(),
            tags: tags.to_vec(),
            body,
        }
    }
}

/// Scenarios sharing a precondition
#[derive(Clone)]
pub struct Suite {
    /// Suite name
    pub name: String,
    /// Runs before every scenario, as the "Before hooks" step
    pub before_each: Option<ScenarioFn>,
    /// Scenarios in declaration order
    pub scenarios: Vec<Scenario>,
}

impl fmt::Debug for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Suite")
            .field("name", &self.name)
            .field("before_each", &self.before_each.is_some())
            .field("scenarios", &self.scenarios)
            .finish()
    }
}

impl Suite {
    /// Create an empty suite
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            before_each: None,
            scenarios: Vec::new(),
        }
    }

    /// Set the hook run before every scenario
    #[must_use]
    pub fn with_before_each(mut self, hook: ScenarioFn) -> Self {
        self.before_each = Some(hook);
        self
    }

    /// Append a scenario
    #[must_use]
    pub fn with_scenario(mut self, scenario: Scenario) -> Self {
        self.scenarios.push(scenario);
        self
    }

    /// Scenarios selected by `filter`, in declaration order
    #[must_use]
    pub fn select(&self, filter: &TagFilter) -> Vec<&Scenario> {
        self.scenarios
            .iter()
            .filter(|s| filter.matches(&s.tags))
            .collect()
    }

    /// Get the number of scenarios
    #[must_use]
    pub fn scenario_count(&self) -> usize {
        self.scenarios.len()
    }
}

// =============================================================================
// RUNNER
// =============================================================================

/// Opens one fresh, isolated session per scenario
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// Open a session
    ///
    /// # Errors
    ///
    /// Returns launch or driver errors.
    async fn open(&self) -> E2eResult<Session>;
}

/// Runner settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Scenarios in flight at once
    pub workers: usize,
    /// Stop scheduling scenarios after the first failure
    pub fail_fast: bool,
    /// Tag selection
    pub filter: TagFilter,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            workers: 1,
            fail_fast: false,
            filter: TagFilter::all(),
        }
    }
}

impl RunnerConfig {
    /// Set the worker count (at least one)
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Enable fail-fast mode
    #[must_use]
    pub const fn with_fail_fast(mut self) -> Self {
        self.fail_fast = true;
        self
    }

    /// Set the tag filter
    #[must_use]
    pub fn with_filter(mut self, filter: TagFilter) -> Self {
        self.filter = filter;
        self
    }
}

/// Runs suites against sessions from a factory
#[derive(Debug)]
pub struct SuiteRunner<F> {
    factory: F,
    environment: Environment,
    config: RunnerConfig,
    stopped: AtomicBool,
}

impl<F: SessionFactory> SuiteRunner<F> {
    /// Create a runner
    #[must_use]
    pub fn new(factory: F, environment: Environment, config: RunnerConfig) -> Self {
        Self {
            factory,
            environment,
            config,
            stopped: AtomicBool::new(false),
        }
    }

    /// The session factory
    #[must_use]
    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Run one suite
    pub async fn run_suite(&self, suite: &Suite) -> SuiteReport {
        let mut suites = self.run_suites(std::slice::from_ref(suite)).await;
        suites.pop().unwrap_or_else(|| SuiteReport {
            name: suite.name.clone(),
            scenarios: Vec::new(),
        })
    }

    /// Run every suite and collect a report
    pub async fn run_all(&self, suites: &[Suite]) -> RunReport {
        let started_at = Utc::now();
        let start = Instant::now();
        let reports = self.run_suites(suites).await;
        let report = RunReport::new(started_at, start.elapsed(), reports);
        info!(
            passed = report.passed_count(),
            failed = report.failed_count(),
            skipped = report.skipped_count(),
            "run finished"
        );
        report
    }

    async fn run_suites(&self, suites: &[Suite]) -> Vec<SuiteReport> {
        let jobs: Vec<(usize, &Suite, &Scenario)> = suites
            .iter()
            .enumerate()
            .flat_map(|(i, suite)| {
                suite
                    .select(&self.config.filter)
                    .into_iter()
                    .map(move |scenario| (i, suite, scenario))
            })
            .collect();

        let finished: Vec<(usize, ScenarioReport)> = stream::iter(jobs)
            .map(|(i, suite, scenario)| async move { (i, self.run_scenario(suite, scenario).await) })
            .buffered(self.config.workers.max(1))
            .collect()
            .await;

        let mut reports: Vec<SuiteReport> = suites
            .iter()
            .map(|s| SuiteReport {
                name: s.name.clone(),
                scenarios: Vec::new(),
            })
            .collect();
        for (i, report) in finished {
            reports[i].scenarios.push(report);
        }
        reports
    }

    async fn run_scenario(&self, suite: &Suite, scenario: &Scenario) -> ScenarioReport {
        if self.config.fail_fast && self.stopped.load(Ordering::SeqCst) {
            info!(suite = %suite.name, scenario = %scenario.name, "skipped after earlier failure");
            return ScenarioReport::skipped(&suite.name, &scenario.name, scenario.tags.clone());
        }

        let span = info_span!("scenario", suite = %suite.name, scenario = %scenario.name);
        let report = self.execute(suite, scenario).instrument(span).await;

        if report.status.is_failed() {
            self.stopped.store(true, Ordering::SeqCst);
            warn!(
                suite = %suite.name,
                scenario = %scenario.name,
                step = report.failed_step.as_deref().unwrap_or("-"),
                error = report.error.as_deref().unwrap_or("-"),
                "scenario failed"
            );
        } else {
            info!(suite = %suite.name, scenario = %scenario.name, duration_ms = report.duration_ms, "scenario passed");
        }
        report
    }

    async fn execute(&self, suite: &Suite, scenario: &Scenario) -> ScenarioReport {
        let start = Instant::now();
        let mut report = ScenarioReport::skipped(&suite.name, &scenario.name, scenario.tags.clone());

        let outcome = match self.factory.open().await {
            Ok(session) => {
                let outcome = run_body(&session, suite, scenario, &self.environment).await;
                if let Err(e) = session.close().await {
                    warn!(error = %e, "failed to close session");
                }
                report.steps = session.trace().records();
                report.failed_step = session.trace().failed_step().map(|s| s.name);
                outcome
            }
            Err(e) => Err(e),
        };

        report.duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        match outcome {
            Ok(()) => report.status = ScenarioStatus::Passed,
            Err(e) => {
                report.status = ScenarioStatus::Failed;
                report.error = Some(e.to_string());
            }
        }
        report
    }
}

async fn run_body(
    session: &Session,
    suite: &Suite,
    scenario: &Scenario,
    environment: &Environment,
) -> E2eResult<()> {
    let fixture = Fixture::new(session);
    if let Some(hook) = suite.before_each {
        session
            .step("Before hooks", hook(&fixture, environment))
            .await?;
    }
    (scenario.body)(&fixture, environment).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::locator::Locator;
    use crate::mock::{MockDocument, MockElement, MockSessionFactory, StaticSite};
    use crate::result::E2eError;
    use crate::session::SessionSettings;
    use crate::wait::WaitPolicy;
    use futures::FutureExt;

    fn env() -> Environment {
        Environment::from_lookup(|key| Some(format!("value-of-{key}"))).unwrap()
    }

    fn site() -> StaticSite {
        StaticSite::new(
            "http://storefront.test/",
            MockDocument::new(vec![MockElement::new("h1").id("title").text("Products")]),
        )
    }

    fn factory() -> MockSessionFactory<fn() -> StaticSite> {
        MockSessionFactory::new(
            site as fn() -> StaticSite,
            SessionSettings::default().with_wait(WaitPolicy::from_millis(30, 5)),
        )
    }

    fn passes<'a>(fixture: &'a Fixture<'a>, _: &'a Environment) -> BoxFuture<'a, E2eResult<()>> {
        async move {
            let session = fixture.session();
            session
                .step("Read title", session.expect(&Locator::css("#title")).to_have_text("Products"))
                .await
        }
        .boxed()
    }

    fn fails<'a>(fixture: &'a Fixture<'a>, _: &'a Environment) -> BoxFuture<'a, E2eResult<()>> {
        async move {
            let session = fixture.session();
            session
                .step("Read title", session.expect(&Locator::css("#title")).to_have_text("Cart"))
                .await
        }
        .boxed()
    }

    fn hook_fails<'a>(_: &'a Fixture<'a>, _: &'a Environment) -> BoxFuture<'a, E2eResult<()>> {
        async { Err(E2eError::driver("login page unreachable")) }.boxed()
    }

    mod tag_tests {
        use super::*;

        #[test]
        fn test_parse() {
            assert_eq!("@purchase".parse::<Tag>().unwrap(), Tag::Purchase);
            assert_eq!("Filter".parse::<Tag>().unwrap(), Tag::Filter);
            assert_eq!(" @PRICE ".parse::<Tag>().unwrap(), Tag::Price);
            assert_eq!(
                "@smoke".parse::<Tag>().unwrap_err(),
                ParseTagError("@smoke".to_string())
            );
        }

        #[test]
        fn test_display() {
            assert_eq!(Tag::Checkout.to_string(), "@checkout");
        }

        #[test]
        fn test_filter() {
            let tags = [Tag::Purchase, Tag::Filter, Tag::Name];
            assert!(TagFilter::all().matches(&tags));
            assert!(TagFilter::all().with_include([Tag::Name]).matches(&tags));
            assert!(!TagFilter::all().with_include([Tag::Login]).matches(&tags));
            assert!(!TagFilter::all()
                .with_include([Tag::Purchase])
                .with_exclude([Tag::Name])
                .matches(&tags));
            assert!(!TagFilter::all().with_exclude([Tag::Filter]).matches(&tags));
        }
    }

    mod runner_tests {
        use super::*;

        fn suite() -> Suite {
            Suite::new("Demo")
                .with_scenario(Scenario::new("first", &[Tag::Purchase], passes))
                .with_scenario(Scenario::new("second", &[Tag::Cart], fails))
                .with_scenario(Scenario::new("third", &[Tag::Purchase], passes))
        }

        #[tokio::test]
        async fn test_reports_in_declaration_order() {
            let runner = SuiteRunner::new(factory(), env(), RunnerConfig::default().with_workers(3));
            let report = runner.run_suite(&suite()).await;

            let statuses: Vec<_> = report.scenarios.iter().map(|s| s.status).collect();
            assert_eq!(
                statuses,
                vec![
                    ScenarioStatus::Passed,
                    ScenarioStatus::Failed,
                    ScenarioStatus::Passed
                ]
            );
            let failed = &report.scenarios[1];
            assert_eq!(failed.failed_step.as_deref(), Some("Read title"));
            assert!(failed.error.as_deref().unwrap().contains("\"Cart\""));
            assert_eq!(runner.factory().opened_count(), 3);
        }

        #[tokio::test]
        async fn test_fail_fast_skips_later_scenarios() {
            let config = RunnerConfig::default().with_fail_fast();
            let runner = SuiteRunner::new(factory(), env(), config);
            let report = runner.run_suite(&suite()).await;

            assert_eq!(report.scenarios[2].status, ScenarioStatus::Skipped);
            assert_eq!(runner.factory().opened_count(), 2);
        }

        #[tokio::test]
        async fn test_tag_filter_limits_scenarios() {
            let config = RunnerConfig::default().with_filter(TagFilter::all().with_include([Tag::Cart]));
            let runner = SuiteRunner::new(factory(), env(), config);
            let report = runner.run_all(&[suite()]).await;

            assert_eq!(report.total(), 1);
            assert_eq!(report.suites[0].scenarios[0].name, "second");
        }

        #[tokio::test]
        async fn test_before_each_failure_fails_scenario() {
            let suite = Suite::new("Hooked")
                .with_before_each(hook_fails)
                .with_scenario(Scenario::new("never reached", &[Tag::Login], passes));
            let runner = SuiteRunner::new(factory(), env(), RunnerConfig::default());
            let report = runner.run_suite(&suite).await;

            let scenario = &report.scenarios[0];
            assert_eq!(scenario.status, ScenarioStatus::Failed);
            assert_eq!(scenario.failed_step.as_deref(), Some("Before hooks"));
            assert_eq!(scenario.steps.len(), 1);
        }
    }
}
