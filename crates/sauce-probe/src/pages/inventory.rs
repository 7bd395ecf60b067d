//! Product listing, cart badge and cart screen

use crate::locator::{AriaRole, Locator};
use crate::ordering;
use crate::page_object::PageObject;
use crate::result::{E2eError, E2eResult};
use crate::session::Session;
use crate::wait::WaitState;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// SORT OPTIONS
// =============================================================================

/// Choices of the product sort dropdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOption {
    /// Name (A to Z)
    NameAscending,
    /// Name (Z to A)
    NameDescending,
    /// Price (low to high)
    PriceAscending,
    /// Price (high to low)
    PriceDescending,
}

impl SortOption {
    /// Every option, in dropdown order
    pub const ALL: [Self; 4] = [
        Self::NameAscending,
        Self::NameDescending,
        Self::PriceAscending,
        Self::PriceDescending,
    ];

    /// Visible label of the option
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NameAscending => "Name (A to Z)",
            Self::NameDescending => "Name (Z to A)",
            Self::PriceAscending => "Price (low to high)",
            Self::PriceDescending => "Price (high to low)",
        }
    }

    /// Whether the option orders by price
    #[must_use]
    pub const fn is_price(self) -> bool {
        matches!(self, Self::PriceAscending | Self::PriceDescending)
    }

    /// Whether `names` are in this option's order.
    ///
    /// Price options place no constraint on names.
    #[must_use]
    pub fn verify_names<S: AsRef<str>>(self, names: &[S]) -> bool {
        match self {
            Self::NameAscending => ordering::is_ascending_by_name(names),
            Self::NameDescending => ordering::is_descending_by_name(names),
            Self::PriceAscending | Self::PriceDescending => true,
        }
    }

    /// Whether `prices` are in this option's order.
    ///
    /// Name options place no constraint on prices.
    #[must_use]
    pub fn verify_prices(self, prices: &[f64]) -> bool {
        match self {
            Self::PriceAscending => ordering::is_non_decreasing(prices),
            Self::PriceDescending => ordering::is_non_increasing(prices),
            Self::NameAscending | Self::NameDescending => true,
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortOption {
    type Err = E2eError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|o| o.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| E2eError::Parse {
                value: s.to_string(),
                message: "not a sort option".to_string(),
            })
    }
}

/// Parse a displayed price such as `$29.99`
///
/// # Errors
///
/// Returns [`E2eError::Parse`] if what remains after the `$` is not a number.
pub fn parse_price(text: &str) -> E2eResult<f64> {
    let trimmed = text.trim();
    let number = trimmed.strip_prefix('$').unwrap_or(trimmed).trim();
    number.parse::<f64>().map_err(|e| E2eError::Parse {
        value: text.to_string(),
        message: e.to_string(),
    })
}

// =============================================================================
// PAGE
// =============================================================================

/// Elements of the product listing and cart
#[derive(Debug, Clone)]
pub struct InventoryElements {
    /// Sort dropdown
    pub product_sort_container: Locator,
    /// Product rows
    pub inventory_items: Locator,
    /// Product names
    pub product_name: Locator,
    /// Product prices
    pub product_price: Locator,
    /// Add-to-cart buttons
    pub add_to_cart_button: Locator,
    /// Remove buttons
    pub remove_button: Locator,
    /// Cart icon with its badge
    pub shopping_cart: Locator,
    /// Item names on the cart screen
    pub cart_items: Locator,
    /// Checkout link on the cart screen
    pub checkout_button: Locator,
}

impl Default for InventoryElements {
    fn default() -> Self {
        Self {
            product_sort_container: Locator::any_role(AriaRole::Combobox),
            inventory_items: Locator::css(".inventory_item"),
            product_name: Locator::css(".inventory_item_name"),
            product_price: Locator::css(".inventory_item_price"),
            add_to_cart_button: Locator::role(AriaRole::Button, "ADD TO CART"),
            remove_button: Locator::role(AriaRole::Button, "REMOVE"),
            shopping_cart: Locator::css("#shopping_cart_container"),
            cart_items: Locator::css(".inventory_item_name"),
            checkout_button: Locator::role(AriaRole::Link, "CHECKOUT"),
        }
    }
}

/// The product listing (and, after clicking the cart, the cart screen)
#[derive(Debug)]
pub struct InventoryPage<'s> {
    session: &'s Session,
    /// Locators
    pub elements: InventoryElements,
}

impl<'s> InventoryPage<'s> {
    /// Create the page object
    #[must_use]
    pub fn new(session: &'s Session) -> Self {
        Self {
            session,
            elements: InventoryElements::default(),
        }
    }

    /// Open the listing and wait for the sort dropdown
    ///
    /// # Errors
    ///
    /// Returns navigation errors or a timeout.
    pub async fn navigate(&self) -> E2eResult<()> {
        self.session
            .step("Navigate to inventory page", async {
                self.session.goto(&self.url()).await?;
                self.session
                    .wait_for(&self.elements.product_sort_container, WaitState::Attached)
                    .await
            })
            .await
    }

    /// Choose a sort order
    ///
    /// # Errors
    ///
    /// Returns a timeout if the dropdown never appears.
    pub async fn select_product_filter(&self, option: SortOption) -> E2eResult<()> {
        self.session
            .step(&format!("Select product filter: {option}"), async {
                let sort = &self.elements.product_sort_container;
                self.session.wait_for(sort, WaitState::Visible).await?;
                self.session.select_option(sort, option.label()).await
            })
            .await
    }

    /// Names of the listed products, in display order.
    ///
    /// Waits for at least one product first.
    ///
    /// # Errors
    ///
    /// Returns a timeout if the list stays empty.
    pub async fn get_product_names(&self) -> E2eResult<Vec<String>> {
        self.session
            .step("Get product names", async {
                let names = &self.elements.product_name;
                self.session
                    .wait_for(&names.first(), WaitState::Visible)
                    .await?;
                self.session.all_text_contents(names).await
            })
            .await
    }

    /// Names currently listed, without waiting; may be empty
    ///
    /// # Errors
    ///
    /// Returns driver errors.
    pub async fn snapshot_product_names(&self) -> E2eResult<Vec<String>> {
        self.session
            .all_text_contents(&self.elements.product_name)
            .await
    }

    /// Prices of the listed products, in display order
    ///
    /// # Errors
    ///
    /// Returns a timeout if the list stays empty, or [`E2eError::Parse`] for
    /// a price that is not a number.
    pub async fn get_product_prices(&self) -> E2eResult<Vec<f64>> {
        self.session
            .step("Get product prices", async {
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

    /// Row of the product whose text contains `product_name`
    fn product_row(&self, product_name: &str) -> Locator {
        self.elements.inventory_items.filter_has_text(product_name)
    }

    async fn click_in_row(&self, product_name: &str, button: &Locator) -> E2eResult<()> {
        let row = self.product_row(product_name);
        self.session
            .wait_for(&row.first(), WaitState::Visible)
            .await?;
        let target = row.locator(button).first();
        self.session.wait_for(&target, WaitState::Visible).await?;
        self.session.click(&target).await
    }

    /// Add the named product to the cart.
    ///
    /// If several rows match the name, the first one wins.
    ///
    /// # Errors
    ///
    /// Returns a timeout if the product or its add button never appears.
    pub async fn add_product_to_cart(&self, product_name: &str) -> E2eResult<()> {
        self.session
            .step(&format!("Add product to cart: {product_name}"), async {
                self.click_in_row(product_name, &self.elements.add_to_cart_button)
                    .await
            })
            .await
    }

    /// Remove the named product from the cart
    ///
    /// # Errors
    ///
    /// Returns a timeout if the product or its remove button never appears.
    pub async fn remove_product_from_cart(&self, product_name: &str) -> E2eResult<()> {
        self.session
            .step(&format!("Remove product from cart: {product_name}"), async {
                self.click_in_row(product_name, &self.elements.remove_button)
                    .await
            })
            .await
    }

    /// Assert the cart badge shows `count`
    ///
    /// # Errors
    ///
    /// Returns a mismatch carrying the badge text last seen.
    pub async fn check_shopping_cart_count(&self, count: usize) -> E2eResult<()> {
        self.session
            .step(&format!("Check shopping cart count: {count}"), async {
                let cart = &self.elements.shopping_cart;
                self.session.wait_for(cart, WaitState::Visible).await?;
                self.session
                    .expect(cart)
                    .to_have_text(&count.to_string())
                    .await
            })
            .await
    }

    /// Open the cart screen
    ///
    /// # Errors
    ///
    /// Returns a timeout if the cart icon never appears.
    pub async fn click_shopping_cart(&self) -> E2eResult<()> {
        self.session
            .step("Click shopping cart", async {
                let cart = &self.elements.shopping_cart;
                self.session.wait_for(cart, WaitState::Visible).await?;
                self.session.click(cart).await
            })
            .await
    }

    /// Names of the items on the cart screen
    ///
    /// # Errors
    ///
    /// Returns a timeout if the cart is empty.
    pub async fn check_cart_products(&self) -> E2eResult<Vec<String>> {
        self.session
            .step("Get cart products", async {
                let items = &self.elements.cart_items;
                self.session
                    .wait_for(&items.first(), WaitState::Visible)
                    .await?;
                self.session.all_text_contents(items).await
            })
            .await
    }

    /// Proceed from the cart to checkout
    ///
    /// # Errors
    ///
    /// Returns a timeout if the link never appears.
    pub async fn click_checkout(&self) -> E2eResult<()> {
        self.session
            .step("Click checkout button", async {
                let link = &self.elements.checkout_button;
                self.session.wait_for(link, WaitState::Visible).await?;
                self.session.click(link).await
            })
            .await
    }
}

impl PageObject for InventoryPage<'_> {
    fn session(&self) -> &Session {
        self.session
    }

    fn url(&self) -> String {
        self.session.urls().inventory()
    }

    fn page_name(&self) -> &'static str {
        "inventory"
    }
}
