//! PageDriver - the browser automation boundary.
//!
//! Everything the page objects need from a browser goes through this trait:
//! navigation, locator resolution, text extraction and the three actions
//! (click, fill, select). Implementations:
//!
//! - `CdpDriver` (feature `browser`): a chromiumoxide page in its own
//!   browser context
//! - [`MockDriver`](crate::mock::MockDriver): an in-memory document served by
//!   a [`MockSite`](crate::mock::MockSite)
//!
//! Drivers perform single attempts. Waiting and retrying belong to the
//! [`Session`](crate::Session), which applies its [`WaitPolicy`](crate::WaitPolicy)
//! on top.

use crate::locator::Locator;
use crate::result::{E2eError, E2eResult};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

/// Single-attempt browser operations over lazily resolved locators
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Load `url` and wait for the load event, up to `timeout`
    async fn goto(&self, url: &str, timeout: Duration) -> E2eResult<()>;

    /// URL of the current document
    async fn current_url(&self) -> E2eResult<String>;

    /// Number of elements the locator resolves to right now
    async fn count(&self, locator: &Locator) -> E2eResult<usize>;

    /// Whether the first match exists and is rendered visibly
    async fn is_visible(&self, locator: &Locator) -> E2eResult<bool>;

    /// Text content of every match, in document order
    async fn text_contents(&self, locator: &Locator) -> E2eResult<Vec<String>>;

    /// Click the single matching element
    async fn click(&self, locator: &Locator) -> E2eResult<()>;

    /// Replace the value of the single matching input
    async fn fill(&self, locator: &Locator, value: &str) -> E2eResult<()>;

    /// Choose the option whose label (or value) equals `label`
    async fn select_option(&self, locator: &Locator, label: &str) -> E2eResult<()>;

    /// Release the page
    async fn close(&self) -> E2eResult<()> {
        Ok(())
    }
}

/// Actions are strict: they need exactly one target
///
/// # Errors
///
/// Returns [`E2eError::AmbiguousTarget`] when `count != 1`.
pub fn ensure_single(locator: &Locator, count: usize) -> E2eResult<()> {
    if count == 1 {
        Ok(())
    } else {
        Err(E2eError::AmbiguousTarget {
            target: locator.to_string(),
            count,
        })
    }
}

/// Run two teardown steps in order, the second even when the first fails
///
/// # Errors
///
/// Returns the first error encountered.
#[cfg_attr(not(feature = "browser"), allow(dead_code))]
pub(crate) async fn teardown_both<A, B>(first: A, second: B) -> E2eResult<()>
where
    A: Future<Output = E2eResult<()>>,
    B: Future<Output = E2eResult<()>>,
{
    let first = first.await;
    let second = second.await;
    first.and(second)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_ensure_single() {
        let locator = Locator::css("#login-button");
        assert!(ensure_single(&locator, 1).is_ok());

        match ensure_single(&locator, 0) {
            Err(E2eError::AmbiguousTarget { target, count }) => {
                assert_eq!(target, "#login-button");
                assert_eq!(count, 0);
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(ensure_single(&locator, 3).is_err());
    }

    #[tokio::test]
    async fn test_teardown_runs_second_after_failure() {
        let disposed = AtomicBool::new(false);
        let result = teardown_both(
            async { Err(E2eError::driver("page already gone")) },
            async {
                disposed.store(true, Ordering::SeqCst);
                Err(E2eError::driver("context busy"))
            },
        )
        .await;

        assert!(disposed.load(Ordering::SeqCst));
        let message = result.unwrap_err().to_string();
        assert!(message.contains("page already gone"));
    }

    #[tokio::test]
    async fn test_teardown_reports_second_failure() {
        let result = teardown_both(async { Ok(()) }, async {
            Err(E2eError::driver("context busy"))
        })
        .await;
        assert!(result.unwrap_err().to_string().contains("context busy"));
    }
}
