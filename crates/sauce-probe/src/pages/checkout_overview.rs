//! Checkout step two: order overview

use super::inventory::parse_price;
use crate::assertion::Assertion;
use crate::locator::{AriaRole, Locator};
use crate::page_object::PageObject;
use crate::result::{E2eError, E2eResult};
use crate::session::Session;
use crate::wait::WaitState;

/// Elements of the order overview
#[derive(Debug, Clone)]
pub struct CheckoutOverviewElements {
    /// Item names
    pub cart_items: Locator,
    /// Item prices
    pub product_price: Locator,
    /// Item quantities
    pub product_quantity: Locator,
    /// "Item total: $N" label
    pub total_price: Locator,
    /// Finish link
    pub finish_button: Locator,
    /// Cancel link
    pub cancel_button: Locator,
}

impl Default for CheckoutOverviewElements {
    fn default() -> Self {
        Self {
            cart_items: Locator::css(".inventory_item_name"),
            product_price: Locator::css(".inventory_item_price"),
            product_quantity: Locator::css(".summary_quantity"),
            total_price: Locator::css(".summary_subtotal_label"),
            finish_button: Locator::role(AriaRole::Link, "FINISH"),
            cancel_button: Locator::role(AriaRole::Link, "CANCEL"),
        }
    }
}

/// Checkout step two
#[derive(Debug)]
pub struct CheckoutOverviewPage<'s> {
    session: &'s Session,
    /// Locators
    pub elements: CheckoutOverviewElements,
}

/// Parse the subtotal label, e.g. `Item total: $29.99`
///
/// # Errors
///
/// Returns [`E2eError::Parse`] if the label has no price after the colon.
pub fn parse_subtotal(text: &str) -> E2eResult<f64> {
    let (_, amount) = text.split_once(':').ok_or_else(|| E2eError::Parse {
        value: text.to_string(),
        message: "expected \"Item total: $N\"".to_string(),
    })?;
    parse_price(amount)
}

/// Parse an item quantity cell
///
/// # Errors
///
/// Returns [`E2eError::Parse`] unless the cell holds a whole number.
pub fn parse_quantity(text: &str) -> E2eResult<u32> {
    text.trim().parse::<u32>().map_err(|e| E2eError::Parse {
        value: text.to_string(),
        message: e.to_string(),
    })
}

/// Sum of price times quantity over the order lines
///
/// # Errors
///
/// Returns a mismatch when there is not one quantity per price.
pub fn order_subtotal(prices: &[f64], quantities: &[u32]) -> E2eResult<f64> {
    Assertion::has_length("item quantities", quantities, prices.len())?;
    Ok(prices
        .iter()
        .zip(quantities)
        .map(|(price, quantity)| price * f64::from(*quantity))
        .sum())
}

impl<'s> CheckoutOverviewPage<'s> {
    /// Create the page object
    #[must_use]
    pub fn new(session: &'s Session) -> Self {
        Self {
            session,
            elements: CheckoutOverviewElements::default(),
        }
    }

    /// Open the overview directly
    ///
    /// # Errors
    ///
    /// Returns navigation errors or a timeout.
    pub async fn navigate(&self) -> E2eResult<()> {
        self.session
            .step("Navigate to checkout overview page", async {
                self.session.goto(&self.url()).await?;
                self.session
                    .wait_for(&self.elements.finish_button, WaitState::Attached)
                    .await
            })
            .await
    }

    /// Names of the items in the order
    ///
    /// # Errors
    ///
    /// Returns a timeout if the order is empty.
    pub async fn check_checkout_products(&self) -> E2eResult<Vec<String>> {
        self.session
            .step("Get checkout products", async {
                let items = &self.elements.cart_items;
                self.session
                    .wait_for(&items.first(), WaitState::Visible)
                    .await?;
                self.session.all_text_contents(items).await
            })
            .await
    }

    /// Prices of the items in the order
    ///
    /// # Errors
    ///
    /// Returns a timeout if the order is empty, or a parse error.
    pub async fn get_item_prices(&self) -> E2eResult<Vec<f64>> {
        self.session
            .step("Get checkout prices", async {
                let prices = &self.elements.product_price;
                self.session
                    .wait_for(&prices.first(), WaitState::Visible)
                    .await?;
                self.session
                    .all_text_contents(prices)
                    .await?
                    .iter()
                    .map(|text| parse_price(text))
                    .collect()
            })
            .await
    }

    /// Quantities of the items in the order
    ///
    /// # Errors
    ///
    /// Returns a timeout if the order is empty, or a parse error.
    pub async fn get_item_quantities(&self) -> E2eResult<Vec<u32>> {
        self.session
            .step("Get checkout quantities", async {
                let quantities = &self.elements.product_quantity;
                self.session
                    .wait_for(&quantities.first(), WaitState::Visible)
                    .await?;
                self.session
                    .all_text_contents(quantities)
                    .await?
                    .iter()
                    .map(|text| parse_quantity(text))
                    .collect()
            })
            .await
    }

    /// Assert the subtotal label matches the listed lines
    ///
    /// Returns the subtotal shown.
    ///
    /// # Errors
    ///
    /// Returns a mismatch if the label is off by a cent or more.
    pub async fn check_subtotal(&self) -> E2eResult<f64> {
        self.session
            .step("Check subtotal", async {
                let prices = self.get_item_prices().await?;
                let quantities = self.get_item_quantities().await?;
                let expected = order_subtotal(&prices, &quantities)?;
                let subtotal = self.get_subtotal().await?;
                Assertion::approx_eq("order subtotal", expected, subtotal, 0.005)?;
                Ok(subtotal)
            })
            .await
    }

    /// Order subtotal before tax
    ///
    /// # Errors
    ///
    /// Returns a timeout if the label never appears, or a parse error.
    pub async fn get_subtotal(&self) -> E2eResult<f64> {
        self.session
            .step("Get subtotal", async {
                let label = &self.elements.total_price;
                self.session.wait_for(label, WaitState::Visible).await?;
                let texts = self.session.all_text_contents(label).await?;
                let text = texts.first().map(String::as_str).unwrap_or_default();
                parse_subtotal(text)
            })
            .await
    }

    /// Place the order
    ///
    /// # Errors
    ///
    /// Returns a timeout if the link never becomes usable.
    pub async fn click_finish_button(&self) -> E2eResult<()> {
        self.session
            .step("Click finish button", async {
                let link = &self.elements.finish_button;
                self.session.wait_for(link, WaitState::Visible).await?;
                self.session.click(link).await
            })
            .await
    }

    /// Abandon the order
    ///
    /// # Errors
    ///
    /// Returns a timeout if the link never becomes usable.
    pub async fn click_cancel(&self) -> E2eResult<()> {
        self.session
            .step("Click cancel button", async {
                let link = &self.elements.cancel_button;
                self.session.wait_for(link, WaitState::Visible).await?;
                self.session.click(link).await
            })
            .await
    }
}

impl PageObject for CheckoutOverviewPage<'_> {
    fn session(&self) -> &Session {
        self.session
    }

    fn url(&self) -> String {
        self.session.urls().checkout_step_two()
    }

    fn page_name(&self) -> &'static str {
        "checkout overview"
    }
}
