//! Order confirmation

use crate::locator::Locator;
use crate::page_object::PageObject;
use crate::result::E2eResult;
use crate::session::Session;
use crate::wait::WaitState;

/// Header shown once an order has been placed
pub const ORDER_CONFIRMATION: &str = "THANK YOU FOR YOUR ORDER";

/// Elements of the confirmation screen
#[derive(Debug, Clone)]
pub struct CheckoutCompleteElements {
    /// Confirmation header
    pub sub_header: Locator,
    /// Delivery illustration
    pub success_image: Locator,
}

impl Default for CheckoutCompleteElements {
    fn default() -> Self {
        Self {
            sub_header: Locator::css(".complete-header"),
            success_image: Locator::css(".pony_express").first(),
        }
    }
}

/// The confirmation screen
#[derive(Debug)]
pub struct CheckoutCompletePage<'s> {
    session: &'s Session,
    /// Locators
    pub elements: CheckoutCompleteElements,
}

impl<'s> CheckoutCompletePage<'s> {
    /// Create the page object
    #[must_use]
    pub fn new(session: &'s Session) -> Self {
        Self {
            session,
            elements: CheckoutCompleteElements::default(),
        }
    }

    /// Open the screen directly
    ///
    /// # Errors
    ///
    /// Returns navigation errors or a timeout.
    pub async fn navigate(&self) -> E2eResult<()> {
        self.session
            .step("Navigate to checkout complete page", async {
                self.session.goto(&self.url()).await?;
                self.session
                    .wait_for(&self.elements.sub_header, WaitState::Attached)
                    .await
            })
            .await
    }

    /// Assert the header contains `text`
    ///
    /// # Errors
    ///
    /// Returns a mismatch carrying the header last seen.
    pub async fn check_sub_header(&self, text: &str) -> E2eResult<()> {
        self.session
            .step("Check sub header", async {
                let header = &self.elements.sub_header;
                self.session.wait_for(header, WaitState::Visible).await?;
                self.session.expect(header).to_contain_text(text).await
            })
            .await
    }

    /// Assert the delivery illustration is shown
    ///
    /// # Errors
    ///
    /// Returns a mismatch if it never becomes visible.
    pub async fn check_success_image(&self) -> E2eResult<()> {
        self.session
            .step("Check success image", async {
                let image = &self.elements.success_image;
                self.session.wait_for(image, WaitState::Attached).await?;
                self.session.expect(image).to_be_visible().await
            })
            .await
    }
}

impl PageObject for CheckoutCompletePage<'_> {
    fn session(&self) -> &Session {
        self.session
    }

    fn url(&self) -> String {
        self.session.urls().checkout_complete()
    }

    fn page_name(&self) -> &'static str {
        "checkout complete"
    }
}
