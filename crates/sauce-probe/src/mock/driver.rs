//! Mock driver over a scripted site.

use super::document::MockDocument;
use crate::driver::{ensure_single, PageDriver};
use crate::harness::SessionFactory;
use crate::locator::Locator;
use crate::result::{E2eError, E2eResult};
use crate::session::{Session, SessionSettings};
use async_trait::async_trait;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Server-side behaviour behind a [`MockDriver`].
///
/// The site renders the current page as a [`MockDocument`] and reacts to
/// actions on keyed elements (see [`MockElement::key`](super::MockElement::key)).
/// A click reaches the nearest keyed element on the pointer's hit path and is
/// inert when there is none. Fill and select need the target itself keyed.
pub trait MockSite: Send {
    /// URL of the current page
    fn url(&self) -> String;

    /// Load `url`
    ///
    /// # Errors
    ///
    /// Implementations return [`E2eError::Navigation`] for unknown URLs.
    fn navigate(&mut self, url: &str) -> E2eResult<()>;

    /// Render the current page
    fn render(&self) -> MockDocument;

    /// React to a click on the element keyed `key`
    ///
    /// # Errors
    ///
    /// Implementation defined.
    fn click(&mut self, _key: &str) -> E2eResult<()> {
        Ok(())
    }

    /// React to `value` being typed into the element keyed `key`
    ///
    /// # Errors
    ///
    /// Implementation defined.
    fn fill(&mut self, _key: &str, _value: &str) -> E2eResult<()> {
        Ok(())
    }

    /// React to the option `label` being chosen in the select keyed `key`
    ///
    /// # Errors
    ///
    /// Implementation defined; typically when no option carries `label`.
    fn select(&mut self, _key: &str, _label: &str) -> E2eResult<()> {
        Ok(())
    }
}

/// A site that always renders the same document
#[derive(Debug, Clone)]
pub struct StaticSite {
    url: String,
    document: MockDocument,
}

impl StaticSite {
    /// Serve `document` at `url`
    #[must_use]
    pub fn new(url: impl Into<String>, document: MockDocument) -> Self {
        Self {
            url: url.into(),
            document,
        }
    }
}

impl MockSite for StaticSite {
    fn url(&self) -> String {
        self.url.clone()
    }

    fn navigate(&mut self, url: &str) -> E2eResult<()> {
        self.url = url.to_string();
        Ok(())
    }

    fn render(&self) -> MockDocument {
        self.document.clone()
    }
}

/// Mock driver for unit testing
pub struct MockDriver {
    site: Mutex<Box<dyn MockSite>>,
    call_history: Mutex<Vec<String>>,
}

impl fmt::Debug for MockDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockDriver")
            .field("calls", &self.history().len())
            .finish_non_exhaustive()
    }
}

impl MockDriver {
    /// Create a driver serving `site`
    #[must_use]
    pub fn new(site: impl MockSite + 'static) -> Self {
        Self {
            site: Mutex::new(Box::new(site)),
            call_history: Mutex::new(Vec::new()),
        }
    }

    fn site(&self) -> MutexGuard<'_, Box<dyn MockSite>> {
        self.site.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, call: String) {
        self.call_history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    /// Get call history
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.call_history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Check if a call starting with `prefix` was made
    #[must_use]
    pub fn was_called(&self, prefix: &str) -> bool {
        self.history().iter().any(|c| c.starts_with(prefix))
    }

    /// Resolve `locator` to its single element's site key
    fn single_key(&self, locator: &Locator) -> E2eResult<Option<String>> {
        let document = self.site().render();
        let found = document.resolve(locator)?;
        ensure_single(locator, found.len())?;
        Ok(found
            .first()
            .and_then(|el| el.site_key())
            .map(str::to_string))
    }

    fn editable_key(&self, locator: &Locator) -> E2eResult<String> {
        self.single_key(locator)?
            .ok_or_else(|| E2eError::driver(format!("{locator} does not accept input")))
    }
}

#[async_trait]
impl PageDriver for MockDriver {
    async fn goto(&self, url: &str, _timeout: Duration) -> E2eResult<()> {
        self.record(format!("goto:{url}"));
        self.site().navigate(url)
    }

    async fn current_url(&self) -> E2eResult<String> {
        Ok(self.site().url())
    }

    async fn count(&self, locator: &Locator) -> E2eResult<usize> {
        Ok(self.site().render().resolve(locator)?.len())
    }

    async fn is_visible(&self, locator: &Locator) -> E2eResult<bool> {
        self.site().render().is_visible(locator)
    }

    async fn text_contents(&self, locator: &Locator) -> E2eResult<Vec<String>> {
        let document = self.site().render();
        Ok(document
            .resolve(locator)?
            .iter()
            .map(|el| el.text_content())
            .collect())
    }

    async fn click(&self, locator: &Locator) -> E2eResult<()> {
        let key = {
            let document = self.site().render();
            let found = document.resolve(locator)?;
            ensure_single(locator, found.len())?;
            found
                .first()
                .and_then(|el| document.click_key(el))
                .map(str::to_string)
        };
        self.record(format!("click:{locator}"));
        match key {
            Some(key) => self.site().click(&key),
            None => Ok(()),
        }
    }

    async fn fill(&self, locator: &Locator, value: &str) -> E2eResult<()> {
        let key = self.editable_key(locator)?;
        self.record(format!("fill:{locator}"));
        self.site().fill(&key, value)
    }

    async fn select_option(&self, locator: &Locator, label: &str) -> E2eResult<()> {
        let key = self.editable_key(locator)?;
        self.record(format!("select:{locator}={label}"));
        self.site().select(&key, label)
    }

    async fn close(&self) -> E2eResult<()> {
        self.record("close".to_string());
        Ok(())
    }
}

/// Opens sessions over mock drivers, one fresh site per session
pub struct MockSessionFactory<F> {
    make_site: F,
    settings: SessionSettings,
    opened: AtomicUsize,
}

impl<F> fmt::Debug for MockSessionFactory<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockSessionFactory")
            .field("settings", &self.settings)
            .field("opened", &self.opened_count())
            .finish_non_exhaustive()
    }
}

impl<F> MockSessionFactory<F> {
    /// Create a factory; `make_site` builds the site for each new session
    #[must_use]
    pub fn new(make_site: F, settings: SessionSettings) -> Self {
        Self {
            make_site,
            settings,
            opened: AtomicUsize::new(0),
        }
    }

    /// Number of sessions opened so far
    #[must_use]
    pub fn opened_count(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<F, S> SessionFactory for MockSessionFactory<F>
where
    F: Fn() -> S + Send + Sync,
    S: MockSite + 'static,
{
    async fn open(&self) -> E2eResult<Session> {
        let _ = self.opened.fetch_add(1, Ordering::SeqCst);
        let driver = Arc::new(MockDriver::new((self.make_site)()));
        Ok(Session::new(driver, self.settings.clone()))
    }
}
