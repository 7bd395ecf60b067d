//! Checkout step one: customer information

use crate::locator::{AriaRole, Locator};
use crate::page_object::PageObject;
use crate::result::E2eResult;
use crate::session::Session;
use crate::wait::WaitState;

/// Customer details typed into the checkout form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Zip / postal code
    pub zip_code: String,
}

impl Customer {
    /// Create a customer
    #[must_use]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        zip_code: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            zip_code: zip_code.into(),
        }
    }
}

/// Elements of the customer information form
#[derive(Debug, Clone)]
pub struct CheckoutInfoElements {
    /// First name input
    pub first_name_input: Locator,
    /// Last name input
    pub last_name_input: Locator,
    /// Postal code input
    pub zip_code_input: Locator,
    /// Continue button
    pub continue_button: Locator,
    /// Cancel link
    pub cancel_button: Locator,
    /// Validation banner
    pub error_message: Locator,
}

impl Default for CheckoutInfoElements {
    fn default() -> Self {
        Self {
            first_name_input: Locator::test_id("firstName"),
            last_name_input: Locator::test_id("lastName"),
            zip_code_input: Locator::test_id("postalCode"),
            continue_button: Locator::role(AriaRole::Button, "CONTINUE"),
            cancel_button: Locator::role(AriaRole::Link, "CANCEL"),
            error_message: Locator::test_id("error"),
        }
    }
}

/// Checkout step one
#[derive(Debug)]
pub struct CheckoutInfoPage<'s> {
    session: &'s Session,
    /// Locators
    pub elements: CheckoutInfoElements,
}

impl<'s> CheckoutInfoPage<'s> {
    /// Create the page object
    #[must_use]
    pub fn new(session: &'s Session) -> Self {
        Self {
            session,
            elements: CheckoutInfoElements::default(),
        }
    }

    async fn fill_field(&self, title: &str, input: &Locator, value: &str) -> E2eResult<()> {
        self.session
            .step(title, async {
                self.session.wait_for(input, WaitState::Visible).await?;
                self.session.fill(input, value).await
            })
            .await
    }

    async fn click_control(&self, title: &str, control: &Locator) -> E2eResult<()> {
        self.session
            .step(title, async {
                self.session.wait_for(control, WaitState::Visible).await?;
                self.session.click(control).await
            })
            .await
    }

    /// Open the form directly and wait for it
    ///
    /// # Errors
    ///
    /// Returns navigation errors or a timeout.
    pub async fn navigate(&self) -> E2eResult<()> {
        self.session
            .step("Navigate to checkout information page", async {
                self.session.goto(&self.url()).await?;
                self.session
                    .wait_for(&self.elements.first_name_input, WaitState::Attached)
                    .await
            })
            .await
    }

    /// Type the first name
    ///
    /// # Errors
    ///
    /// Returns a timeout if the input never becomes usable.
    pub async fn fill_first_name(&self, first_name: &str) -> E2eResult<()> {
        self.fill_field("Fill first name", &self.elements.first_name_input, first_name)
            .await
    }

    /// Type the last name
    ///
    /// # Errors
    ///
    /// Returns a timeout if the input never becomes usable.
    pub async fn fill_last_name(&self, last_name: &str) -> E2eResult<()> {
        self.fill_field("Fill last name", &self.elements.last_name_input, last_name)
            .await
    }

    /// Type the zip code
    ///
    /// # Errors
    ///
    /// Returns a timeout if the input never becomes usable.
    pub async fn fill_zip_code(&self, zip_code: &str) -> E2eResult<()> {
        self.fill_field("Fill zip code", &self.elements.zip_code_input, zip_code)
            .await
    }

    /// Fill all three fields
    ///
    /// # Errors
    ///
    /// Returns the first failing field's error.
    pub async fn fill_customer(&self, customer: &Customer) -> E2eResult<()> {
        self.fill_first_name(&customer.first_name).await?;
        self.fill_last_name(&customer.last_name).await?;
        self.fill_zip_code(&customer.zip_code).await
    }

    /// Submit the form
    ///
    /// # Errors
    ///
    /// Returns a timeout if the button never becomes usable.
    pub async fn click_continue_button(&self) -> E2eResult<()> {
        self.click_control("Click continue button", &self.elements.continue_button)
            .await
    }

    /// Abandon checkout
    ///
    /// # Errors
    ///
    /// Returns a timeout if the link never becomes usable.
    pub async fn click_cancel(&self) -> E2eResult<()> {
        self.click_control("Click cancel button", &self.elements.cancel_button)
            .await
    }

    /// Assert the validation banner contains `expected`
    ///
    /// # Errors
    ///
    /// Returns a timeout if no banner appears, or a mismatch with its text.
    pub async fn check_error_message(&self, expected: &str) -> E2eResult<()> {
        self.session
            .step("Check checkout error message", async {
                let banner = &self.elements.error_message;
                self.session.wait_for(banner, WaitState::Visible).await?;
                self.session.expect(banner).to_contain_text(expected).await
            })
            .await
    }
}

impl PageObject for CheckoutInfoPage<'_> {
    fn session(&self) -> &Session {
        self.session
    }

    fn url(&self) -> String {
        self.session.urls().checkout_step_one()
    }

    fn page_name(&self) -> &'static str {
        "checkout information"
    }
}
