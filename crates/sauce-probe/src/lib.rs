//! Sauce Probe: page objects and end-to-end scenarios for the SauceDemo storefront
//!
//! The crate drives the demo shop through a [`PageDriver`]: chromium over the
//! Chrome `DevTools` Protocol when the `browser` feature is enabled, or the
//! in-memory [`mock`] driver for fast, hermetic tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    SAUCE PROBE Architecture                      │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Suites     │    │ Page       │    │ Session    │            │
//! │   │ (scenarios)│───►│ Objects    │───►│ (waits,    │──► driver  │
//! │   │            │    │ + Fixture  │    │  steps)    │            │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! │         │                                                        │
//! │         ▼                                                        │
//! │   ┌────────────┐    ┌────────────┐                              │
//! │   │ SuiteRunner│───►│ RunReport  │──► console / JSON            │
//! │   └────────────┘    └────────────┘                              │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use sauce_probe::{suites, Environment, RunnerConfig, SessionFactory, SuiteRunner};
//!
//! # async fn run(factory: impl SessionFactory) -> sauce_probe::E2eResult<()> {
//! let environment = Environment::load()?;
//! let runner = SuiteRunner::new(factory, environment, RunnerConfig::default());
//! let report = runner.run_all(&suites::all()).await;
//! assert!(report.all_passed());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

mod assertion;
mod browser;
mod config;
mod driver;
mod fixture;
mod harness;
mod locator;
mod page_object;
mod reporter;
mod result;
mod session;
mod trace;

pub mod mock;
pub mod ordering;
pub mod pages;
pub mod suites;
pub mod wait;

pub use assertion::Assertion;
pub use browser::BrowserConfig;
#[cfg(feature = "browser")]
pub use browser::{CdpBrowser, CdpDriver, CdpSessionFactory};
pub use config::{
    Credentials, Environment, SiteUrls, DEFAULT_BASE_URL, INVALID_PASSWORD, LOCKED_OUT_USERNAME,
    PASSWORD, REQUIRED_KEYS, STANDARD_USERNAME,
};
pub use driver::{ensure_single, PageDriver};
pub use fixture::Fixture;
pub use harness::{
    ParseTagError, RunnerConfig, Scenario, ScenarioFn, SessionFactory, Suite, SuiteRunner, Tag,
    TagFilter,
};
pub use locator::{
    js_string, normalize_text, normalize_whitespace, AriaRole, Locator, LocatorStep, Selector,
};
pub use page_object::PageObject;
pub use reporter::{RunReport, ScenarioReport, ScenarioStatus, SuiteReport};
pub use result::{E2eError, E2eResult};
pub use session::{Expect, Session, SessionSettings};
pub use trace::{StepRecord, StepStatus, StepTrace};
pub use wait::{WaitPolicy, WaitState};

/// Prelude for scenario authors
pub mod prelude {
    pub use super::pages::{
        CheckoutCompletePage, CheckoutInfoPage, CheckoutOverviewPage, Customer, InventoryPage,
        LoginPage, SortOption,
    };
    pub use super::{
        Assertion, Credentials, E2eError, E2eResult, Environment, Fixture, Locator, PageObject,
        Session, Tag,
    };
}
