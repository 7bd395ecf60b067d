//! Browser control over the Chrome `DevTools` Protocol.
//!
//! With the `browser` feature enabled this module launches chromium through
//! chromiumoxide and exposes it as a [`PageDriver`](crate::PageDriver): each
//! session gets its own browser context, so cookies and storage never leak
//! between scenarios. Locators are compiled to JavaScript
//! ([`Locator::to_js`](crate::Locator::to_js)) and evaluated in the page.
//!
//! Without the feature only [`BrowserConfig`] is available.

/// Browser configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            chromium_path: None,
            sandbox: true,
        }
    }
}

impl BrowserConfig {
    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

// ============================================================================
// CDP implementation (when `browser` feature is enabled)
// ============================================================================

#[cfg(feature = "browser")]
mod cdp {
    use super::BrowserConfig;
    use crate::driver::{ensure_single, teardown_both, PageDriver};
    use crate::harness::SessionFactory;
    use crate::locator::{js_string, Locator};
    use crate::result::{E2eError, E2eResult};
    use crate::session::{Session, SessionSettings};
    use async_trait::async_trait;
    use chromiumoxide::browser::{Browser, BrowserConfig as CdpConfig};
    use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
    use chromiumoxide::cdp::browser_protocol::target::{
        CreateBrowserContextParams, CreateTargetParams,
    };
    use chromiumoxide::page::Page;
    use futures::StreamExt;
    use serde::de::DeserializeOwned;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Mutex;

    /// A launched chromium process
    #[derive(Debug)]
    pub struct CdpBrowser {
        config: BrowserConfig,
        inner: Arc<Mutex<Browser>>,
        handle: tokio::task::JoinHandle<()>,
    }

    impl CdpBrowser {
        /// Launch chromium
        ///
        /// # Errors
        ///
        /// Returns [`E2eError::BrowserLaunch`] if chromium cannot be started.
        pub async fn launch(config: BrowserConfig) -> E2eResult<Self> {
            let mut builder =
                CdpConfig::builder().window_size(config.viewport_width, config.viewport_height);

            if !config.headless {
                builder = builder.with_head();
            }

            if !config.sandbox {
                builder = builder.no_sandbox();
            }

            if let Some(ref path) = config.chromium_path {
                builder = builder.chrome_executable(path);
            }

            let cdp_config = builder
                .build()
                .map_err(|message| E2eError::BrowserLaunch { message })?;

            let (browser, mut handler) =
                Browser::launch(cdp_config)
                    .await
                    .map_err(|e| E2eError::BrowserLaunch {
                        message: e.to_string(),
                    })?;

            let handle = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if let Err(e) = event {
                        tracing::debug!(error = %e, "CDP handler stopped");
                        break;
                    }
                }
            });

            tracing::info!(headless = config.headless, "browser launched");

            Ok(Self {
                config,
                inner: Arc::new(Mutex::new(browser)),
                handle,
            })
        }

        /// Get the browser configuration
        #[must_use]
        pub const fn config(&self) -> &BrowserConfig {
            &self.config
        }

        /// Open a blank page in a fresh browser context
        ///
        /// # Errors
        ///
        /// Returns driver errors if the context or target cannot be created.
        pub async fn new_driver(&self) -> E2eResult<CdpDriver> {
            let mut browser = self.inner.lock().await;
            let context = browser
                .create_browser_context(CreateBrowserContextParams::default())
                .await
                .map_err(|e| E2eError::driver(e.to_string()))?;

            let target = CreateTargetParams::builder()
                .url("about:blank")
                .browser_context_id(context.clone())
                .build()
                .map_err(E2eError::driver)?;

            let page = browser
                .new_page(target)
                .await
                .map_err(|e| E2eError::driver(e.to_string()))?;

            Ok(CdpDriver {
                browser: Arc::clone(&self.inner),
                context,
                page,
            })
        }

        /// Close the browser
        ///
        /// # Errors
        ///
        /// Returns driver errors reported while shutting chromium down.
        pub async fn close(&self) -> E2eResult<()> {
            let mut browser = self.inner.lock().await;
            browser
                .close()
                .await
                .map_err(|e| E2eError::driver(e.to_string()))?;
            let _ = browser.wait().await;
            self.handle.abort();
            Ok(())
        }
    }

    /// One page in its own browser context
    #[derive(Debug)]
    pub struct CdpDriver {
        browser: Arc<Mutex<Browser>>,
        context: BrowserContextId,
        page: Page,
    }

    impl CdpDriver {
        async fn eval<T: DeserializeOwned>(&self, script: String) -> E2eResult<T> {
            let result = self
                .page
                .evaluate(script)
                .await
                .map_err(|e| E2eError::driver(e.to_string()))?;
            result
                .into_value()
                .map_err(|e| E2eError::driver(e.to_string()))
        }

        /// Run `body` against the matches of `locator`; `body` sees `els`
        async fn eval_on<T: DeserializeOwned>(&self, locator: &Locator, body: &str) -> E2eResult<T> {
            self.eval(format!(
                "(() => {{ const els = {}; {body} }})()",
                locator.to_js()
            ))
            .await
        }
    }

    const IS_VISIBLE: &str = "if (els.length === 0) return false; \
        const el = els[0]; const style = window.getComputedStyle(el); \
        return style.visibility !== 'hidden' && style.display !== 'none' \
        && !!(el.offsetWidth || el.offsetHeight || el.getClientRects().length);";

    const CLICK_TARGET: &str = "[data-e2e-click-target]";

    /// Tag the single match so the pointer click can find it by CSS
    const MARK_CLICK_TARGET: &str = "document.querySelectorAll('[data-e2e-click-target]') \
        .forEach((el) => el.removeAttribute('data-e2e-click-target')); \
        if (els.length === 1) els[0].setAttribute('data-e2e-click-target', ''); \
        return els.length;";

    #[async_trait]
    impl PageDriver for CdpDriver {
        async fn goto(&self, url: &str, timeout: Duration) -> E2eResult<()> {
            let navigation = tokio::time::timeout(timeout, self.page.goto(url)).await;
            match navigation {
                Ok(Ok(_)) => Ok(()),
                Ok(Err(e)) => Err(E2eError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                }),
                Err(_) => Err(E2eError::Navigation {
                    url: url.to_string(),
                    message: format!("no load event within {}ms", timeout.as_millis()),
                }),
            }
        }

        async fn current_url(&self) -> E2eResult<String> {
            self.page
                .url()
                .await
                .map(Option::unwrap_or_default)
                .map_err(|e| E2eError::driver(e.to_string()))
        }

        async fn count(&self, locator: &Locator) -> E2eResult<usize> {
            self.eval_on(locator, "return els.length;").await
        }

        async fn is_visible(&self, locator: &Locator) -> E2eResult<bool> {
            self.eval_on(locator, IS_VISIBLE).await
        }

        async fn text_contents(&self, locator: &Locator) -> E2eResult<Vec<String>> {
            self.eval_on(locator, "return els.map((el) => el.textContent || '');")
                .await
        }

        async fn click(&self, locator: &Locator) -> E2eResult<()> {
            let count: usize = self.eval_on(locator, MARK_CLICK_TARGET).await?;
            ensure_single(locator, count)?;
            // scrolls into view and presses at the centre, so the event
            // lands on whatever is painted there
            let element = self
                .page
                .find_element(CLICK_TARGET)
                .await
                .map_err(|e| E2eError::driver(e.to_string()))?;
            element
                .click()
                .await
                .map_err(|e| E2eError::driver(e.to_string()))?;
            Ok(())
        }

        async fn fill(&self, locator: &Locator, value: &str) -> E2eResult<()> {
            let body = format!(
                "if (els.length === 1) {{ \
                 const el = els[0]; el.focus(); \
                 const proto = Object.getPrototypeOf(el); \
                 const setter = Object.getOwnPropertyDescriptor(proto, 'value'); \
                 if (setter && setter.set) {{ setter.set.call(el, {value}); }} else {{ el.value = {value}; }} \
                 el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
                 el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
                 }} return els.length;",
                value = js_string(value)
            );
            let count: usize = self.eval_on(locator, &body).await?;
            ensure_single(locator, count)
        }

        async fn select_option(&self, locator: &Locator, label: &str) -> E2eResult<()> {
            let body = format!(
                "if (els.length !== 1) return els.length; \
                 const select = els[0]; const wanted = {label}; \
                 const option = Array.from(select.options || []) \
                   .find((o) => o.label === wanted || o.textContent.trim() === wanted || o.value === wanted); \
                 if (!option) return -1; \
                 select.value = option.value; \
                 select.dispatchEvent(new Event('input', {{ bubbles: true }})); \
                 select.dispatchEvent(new Event('change', {{ bubbles: true }})); \
                 return 1;",
                label = js_string(label)
            );
            let outcome: i64 = self.eval_on(locator, &body).await?;
            match usize::try_from(outcome) {
                Ok(count) => ensure_single(locator, count),
                Err(_) => Err(E2eError::driver(format!(
                    "{locator} has no option labelled {label:?}"
                ))),
            }
        }

        async fn close(&self) -> E2eResult<()> {
            let page = async {
                self.page
                    .clone()
                    .close()
                    .await
                    .map_err(|e| E2eError::driver(e.to_string()))
            };
            let context = async {
                let browser = self.browser.lock().await;
                browser
                    .dispose_browser_context(self.context.clone())
                    .await
                    .map_err(|e| E2eError::driver(e.to_string()))
            };
            teardown_both(page, context).await
        }
    }

    /// Opens every session as a new context of one shared browser
    #[derive(Debug)]
    pub struct CdpSessionFactory {
        browser: CdpBrowser,
        settings: SessionSettings,
    }

    impl CdpSessionFactory {
        /// Wrap a launched browser
        #[must_use]
        pub const fn new(browser: CdpBrowser, settings: SessionSettings) -> Self {
            Self { browser, settings }
        }

        /// The shared browser
        #[must_use]
        pub const fn browser(&self) -> &CdpBrowser {
            &self.browser
        }
    }

    #[async_trait]
    impl SessionFactory for CdpSessionFactory {
        async fn open(&self) -> E2eResult<Session> {
            let driver = self.browser.new_driver().await?;
            tracing::debug!("opened browser context");
            Ok(Session::new(Arc::new(driver), self.settings.clone()))
        }
    }
}

#[cfg(feature = "browser")]
pub use cdp::{CdpBrowser, CdpDriver, CdpSessionFactory};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_config_defaults() {
        let config = BrowserConfig::default();
        assert!(config.headless);
        assert!(config.sandbox);
        assert_eq!((config.viewport_width, config.viewport_height), (1280, 720));
        assert!(config.chromium_path.is_none());
    }

    #[test]
    fn test_browser_config_builders() {
        let config = BrowserConfig::default()
            .with_headless(false)
            .with_viewport(800, 600)
            .with_chromium_path("/usr/bin/chromium")
            .with_no_sandbox();
        assert!(!config.headless);
        assert!(!config.sandbox);
        assert_eq!(config.viewport_width, 800);
        assert_eq!(config.chromium_path.as_deref(), Some("/usr/bin/chromium"));
    }
}
