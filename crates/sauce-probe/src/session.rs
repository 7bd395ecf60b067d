//! Session: one isolated browser page plus the policy used to drive it.
//!
//! The session is the only place that waits. Page objects call its
//! primitives, which poll the [`PageDriver`] under the session's
//! [`WaitPolicy`] and record each named step in a [`StepTrace`].

use crate::config::SiteUrls;
use crate::driver::PageDriver;
use crate::locator::{normalize_whitespace, Locator};
use crate::result::{E2eError, E2eResult};
use crate::trace::StepTrace;
use crate::wait::{
    poll, poll_until, Attempt, Stalled, WaitPolicy, WaitState, DEFAULT_NAVIGATION_TIMEOUT_MS,
};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, Instrument};

const NO_ELEMENT: &str = "<no element>";

// =============================================================================
// SETTINGS
// =============================================================================

/// Per-session configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    /// Element and assertion waits
    pub wait: WaitPolicy,
    /// Page load timeout
    pub navigation_timeout: Duration,
    /// Storefront URLs
    pub urls: SiteUrls,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            wait: WaitPolicy::default(),
            navigation_timeout: Duration::from_millis(DEFAULT_NAVIGATION_TIMEOUT_MS),
            urls: SiteUrls::default(),
        }
    }
}

impl SessionSettings {
    /// Set the wait policy
    #[must_use]
    pub fn with_wait(mut self, wait: WaitPolicy) -> Self {
        self.wait = wait;
        self
    }

    /// Set the navigation timeout
    #[must_use]
    pub fn with_navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }

    /// Set the storefront URLs
    #[must_use]
    pub fn with_urls(mut self, urls: SiteUrls) -> Self {
        self.urls = urls;
        self
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// A single page under test
pub struct Session {
    driver: Arc<dyn PageDriver>,
    settings: SessionSettings,
    trace: StepTrace,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("settings", &self.settings)
            .field("steps", &self.trace.len())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Create a session over a driver
    #[must_use]
    pub fn new(driver: Arc<dyn PageDriver>, settings: SessionSettings) -> Self {
        Self {
            driver,
            settings,
            trace: StepTrace::new(),
        }
    }

    /// Storefront URLs
    #[must_use]
    pub fn urls(&self) -> &SiteUrls {
        &self.settings.urls
    }

    /// Wait policy applied to every primitive
    #[must_use]
    pub fn wait_policy(&self) -> WaitPolicy {
        self.settings.wait
    }

    /// Steps recorded so far
    #[must_use]
    pub fn trace(&self) -> &StepTrace {
        &self.trace
    }

    /// Run `body` as a named step.
    ///
    /// The step is traced with its duration and outcome and runs inside a
    /// `step` span. Its result is passed through unchanged.
    ///
    /// # Errors
    ///
    /// Returns whatever `body` returns.
    pub async fn step<T, F>(&self, name: &str, body: F) -> E2eResult<T>
    where
        F: Future<Output = E2eResult<T>>,
    {
        let index = self.trace.begin(name);
        let result = body.instrument(tracing::info_span!("step", step = name)).await;
        if let Err(e) = &result {
            debug!(step = name, error = %e, "step failed");
        }
        self.trace
            .finish(index, result.as_ref().err().map(ToString::to_string));
        result
    }

    /// Navigate to `url` under the navigation timeout
    ///
    /// # Errors
    ///
    /// Returns [`E2eError::Navigation`] or [`E2eError::Timeout`] from the driver.
    pub async fn goto(&self, url: &str) -> E2eResult<()> {
        debug!(url, "goto");
        self.driver.goto(url, self.settings.navigation_timeout).await
    }

    /// URL of the current document
    ///
    /// # Errors
    ///
    /// Returns driver errors.
    pub async fn current_url(&self) -> E2eResult<String> {
        self.driver.current_url().await
    }

    /// Wait until the locator reaches `state`
    ///
    /// # Errors
    ///
    /// Returns [`E2eError::Timeout`] if the state is not reached in time.
    pub async fn wait_for(&self, locator: &Locator, state: WaitState) -> E2eResult<()> {
        debug!(%locator, %state, "wait_for");
        let description = format!("{locator} to be {state}");
        poll_until(self.settings.wait, &description, || async move {
            let ready = match state {
                WaitState::Attached => self.driver.count(locator).await? > 0,
                WaitState::Visible => self.driver.is_visible(locator).await?,
            };
            Ok(ready.then_some(()))
        })
        .await
    }

    /// Wait until exactly one element matches and it is visible.
    ///
    /// More than one match fails at once; zero matches keep waiting.
    async fn wait_actionable(&self, locator: &Locator) -> E2eResult<()> {
        let description = format!("{locator} to be actionable");
        poll_until(self.settings.wait, &description, || async move {
            match self.driver.count(locator).await? {
                0 => Ok(None),
                1 => Ok(self.driver.is_visible(locator).await?.then_some(())),
                count => Err(E2eError::AmbiguousTarget {
                    target: locator.to_string(),
                    count,
                }),
            }
        })
        .await
    }

    /// Click the single matching element once it is visible
    ///
    /// # Errors
    ///
    /// Returns [`E2eError::Timeout`] if it never becomes actionable, or
    /// [`E2eError::AmbiguousTarget`] if several elements match.
    pub async fn click(&self, locator: &Locator) -> E2eResult<()> {
        debug!(%locator, "click");
        self.wait_actionable(locator).await?;
        self.driver.click(locator).await
    }

    /// Fill the single matching input once it is visible
    ///
    /// # Errors
    ///
    /// Same as [`Session::click`].
    pub async fn fill(&self, locator: &Locator, value: &str) -> E2eResult<()> {
        debug!(%locator, "fill");
        self.wait_actionable(locator).await?;
        self.driver.fill(locator, value).await
    }

    /// Select an option by label on the single matching `<select>`
    ///
    /// # Errors
    ///
    /// Same as [`Session::click`], plus driver errors when no option matches.
    pub async fn select_option(&self, locator: &Locator, label: &str) -> E2eResult<()> {
        debug!(%locator, label, "select_option");
        self.wait_actionable(locator).await?;
        self.driver.select_option(locator, label).await
    }

    /// Text content of every current match, without waiting
    ///
    /// # Errors
    ///
    /// Returns driver errors.
    pub async fn all_text_contents(&self, locator: &Locator) -> E2eResult<Vec<String>> {
        let texts = self.driver.text_contents(locator).await?;
        debug!(%locator, count = texts.len(), "all_text_contents");
        Ok(texts)
    }

    /// Start a polling assertion on `locator`
    #[must_use]
    pub fn expect(&self, locator: &Locator) -> Expect<'_> {
        Expect {
            session: self,
            locator: locator.clone(),
        }
    }

    /// Assert that the current URL equals `expected`, polling until it does
    ///
    /// # Errors
    ///
    /// Returns [`E2eError::AssertionMismatch`] with the last observed URL.
    pub async fn expect_url(&self, expected: &str) -> E2eResult<()> {
        debug!(expected, "expect_url");
        let outcome = poll(self.settings.wait, || async move {
            let url = self.driver.current_url().await?;
            Ok(if url == expected {
                Attempt::Done(())
            } else {
                Attempt::Retry {
                    observed: Some(url),
                }
            })
        })
        .await?;
        settle(outcome, "page URL", &format!("{expected:?}"))
    }

    /// Release the page
    ///
    /// # Errors
    ///
    /// Returns driver errors.
    pub async fn close(&self) -> E2eResult<()> {
        self.driver.close().await
    }
}

/// Turn a stalled poll into an assertion mismatch
fn settle(outcome: Result<(), Stalled>, what: &str, expected: &str) -> E2eResult<()> {
    outcome.map_err(|stalled| {
        E2eError::mismatch(
            what,
            expected,
            stalled.observed.unwrap_or_else(|| NO_ELEMENT.to_string()),
        )
    })
}

// =============================================================================
// EXPECT
// =============================================================================

/// Polling assertions on a locator, created by [`Session::expect`]
#[derive(Debug)]
pub struct Expect<'s> {
    session: &'s Session,
    locator: Locator,
}

impl Expect<'_> {
    /// Poll the single match's whitespace-normalised text until `check` holds
    async fn single_text<C>(&self, what: &str, expected: &str, check: C) -> E2eResult<()>
    where
        C: Fn(&str) -> bool,
    {
        let driver = &self.session.driver;
        let locator = &self.locator;
        let check = &check;
        let outcome = poll(self.session.settings.wait, || async move {
            let texts = driver.text_contents(locator).await?;
            match texts.as_slice() {
                [] => Ok(Attempt::Retry { observed: None }),
                [text] => {
                    let text = normalize_whitespace(text);
                    if check(&text) {
                        Ok(Attempt::Done(()))
                    } else {
                        Ok(Attempt::Retry {
                            observed: Some(format!("{text:?}")),
                        })
                    }
                }
                many => Err(E2eError::AmbiguousTarget {
                    target: locator.to_string(),
                    count: many.len(),
                }),
            }
        })
        .await?;
        settle(
            outcome,
            &format!("{what} of {locator}"),
            &format!("{expected:?}"),
        )
    }

    /// The single match's text equals `expected` (whitespace-normalised)
    ///
    /// # Errors
    ///
    /// Returns [`E2eError::AssertionMismatch`] with the last observed text, or
    /// [`E2eError::AmbiguousTarget`] if several elements match.
    pub async fn to_have_text(&self, expected: &str) -> E2eResult<()> {
        debug!(locator = %self.locator, expected, "expect to_have_text");
        let wanted = normalize_whitespace(expected);
        self.single_text("text", expected, |text| text == wanted)
            .await
    }

    /// The single match's text contains `expected` (whitespace-normalised)
    ///
    /// # Errors
    ///
    /// Same as [`Expect::to_have_text`].
    pub async fn to_contain_text(&self, expected: &str) -> E2eResult<()> {
        debug!(locator = %self.locator, expected, "expect to_contain_text");
        let wanted = normalize_whitespace(expected);
        self.single_text("text", expected, |text| text.contains(&wanted))
            .await
    }

    /// The first match is visible
    ///
    /// # Errors
    ///
    /// Returns [`E2eError::AssertionMismatch`] if it never becomes visible.
    pub async fn to_be_visible(&self) -> E2eResult<()> {
        debug!(locator = %self.locator, "expect to_be_visible");
        let driver = &self.session.driver;
        let locator = &self.locator;
        let outcome = poll(self.session.settings.wait, || async move {
            Ok(if driver.is_visible(locator).await? {
                Attempt::Done(())
            } else {
                Attempt::Retry {
                    observed: Some("hidden or absent".to_string()),
                }
            })
        })
        .await?;
        settle(outcome, &format!("visibility of {locator}"), "visible")
    }

    /// Exactly `expected` elements match
    ///
    /// # Errors
    ///
    /// Returns [`E2eError::AssertionMismatch`] with the last observed count.
    pub async fn to_have_count(&self, expected: usize) -> E2eResult<()> {
        debug!(locator = %self.locator, expected, "expect to_have_count");
        let driver = &self.session.driver;
        let locator = &self.locator;
        let outcome = poll(self.session.settings.wait, || async move {
            let count = driver.count(locator).await?;
            Ok(if count == expected {
                Attempt::Done(())
            } else {
                Attempt::Retry {
                    observed: Some(count.to_string()),
                }
            })
        })
        .await?;
        settle(
            outcome,
            &format!("count of {locator}"),
            &expected.to_string(),
        )
    }
}
