//! Page Object Model support.
//!
//! Every screen of the storefront is a page object: a set of named locators
//! built once, plus verbs that run as traced steps on a borrowed
//! [`Session`]. The trait carries what all of them share.

use crate::result::E2eResult;
use crate::session::Session;
use async_trait::async_trait;

/// A screen of the storefront
#[async_trait]
pub trait PageObject: Sync {
    /// Session the page drives
    fn session(&self) -> &Session;

    /// Absolute URL of the screen
    fn url(&self) -> String;

    /// Name used in logs and step titles
    fn page_name(&self) -> &'static str;

    /// Assert the browser is on `url` (polling)
    ///
    /// # Errors
    ///
    /// Returns an assertion mismatch carrying the last observed URL.
    async fn check_url(&self, url: &str) -> E2eResult<()> {
        let session = self.session();
        session
            .step(&format!("Check URL is {url}"), session.expect_url(url))
            .await
    }

    /// Whether the browser is currently on this screen
    ///
    /// # Errors
    ///
    /// Returns driver errors.
    async fn is_current(&self) -> E2eResult<bool> {
        Ok(self.session().current_url().await? == self.url())
    }
}
