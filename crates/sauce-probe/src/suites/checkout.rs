//! "Add item and checkout": cart and purchase flow

use crate::assertion::Assertion;
use crate::config::Environment;
use crate::fixture::Fixture;
use crate::harness::{Scenario, Suite, Tag};
use crate::page_object::PageObject;
use crate::pages::{Customer, ORDER_CONFIRMATION};
use crate::result::E2eResult;
use futures::future::BoxFuture;
use futures::FutureExt;

/// Products added in "Add items to the Cart"
pub const CART_PRODUCTS: [&str; 3] = [
    "Sauce Labs Backpack",
    "Sauce Labs Bike Light",
    "Sauce Labs Onesie",
];

/// Product bought in "Perform Checkout"
pub const CHECKOUT_PRODUCT: &str = "Sauce Labs Backpack";

/// Customer used in "Perform Checkout"
#[must_use]
pub fn checkout_customer() -> Customer {
    Customer::new("Ram", "Bhai", "12345")
}

/// The suite
#[must_use]
pub fn suite() -> Suite {
    Suite::new("Add item and checkout")
        .with_before_each(login_and_open_inventory)
        .with_scenario(Scenario::new(
            "Add items to the Cart",
            &[Tag::Purchase, Tag::Cart],
            add_items_to_cart,
        ))
        .with_scenario(Scenario::new(
            "Perform Checkout",
            &[Tag::Purchase, Tag::Checkout],
            perform_checkout,
        ))
}

fn login_and_open_inventory<'a>(
    fx: &'a Fixture<'a>,
    env: &'a Environment,
) -> BoxFuture<'a, E2eResult<()>> {
    async move {
        fx.login.login(&env.standard_user()).await?;
        fx.login.check_url(&fx.inventory.url()).await?;
        fx.inventory.navigate().await
    }
    .boxed()
}

fn add_items_to_cart<'a>(
    fx: &'a Fixture<'a>,
    _env: &'a Environment,
) -> BoxFuture<'a, E2eResult<()>> {
    async move {
        let inventory = &fx.inventory;
        for product in CART_PRODUCTS {
            inventory.add_product_to_cart(product).await?;
        }
        inventory
            .check_shopping_cart_count(CART_PRODUCTS.len())
            .await?;
        inventory.click_shopping_cart().await?;
        inventory.check_url(&fx.session().urls().cart()).await?;

        let cart = inventory.check_cart_products().await?;
        Assertion::has_length("cart products", &cart, CART_PRODUCTS.len())?;
        Assertion::equals("cart products", CART_PRODUCTS.as_slice(), cart.as_slice())
    }
    .boxed()
}

fn perform_checkout<'a>(fx: &'a Fixture<'a>, _env: &'a Environment) -> BoxFuture<'a, E2eResult<()>> {
    async move {
        let urls = fx.session().urls();
        let inventory = &fx.inventory;

        inventory.add_product_to_cart(CHECKOUT_PRODUCT).await?;
        inventory.check_shopping_cart_count(1).await?;
        inventory.click_shopping_cart().await?;
        inventory.check_url(&urls.cart()).await?;
        let cart = inventory.check_cart_products().await?;
        Assertion::equals("cart products", [CHECKOUT_PRODUCT].as_slice(), cart.as_slice())?;
        inventory.click_checkout().await?;

        let info = &fx.checkout_info;
        info.check_url(&urls.checkout_step_one()).await?;
        info.fill_customer(&checkout_customer()).await?;
        info.click_continue_button().await?;
        info.check_url(&urls.checkout_step_two()).await?;

        let overview = &fx.checkout_overview;
        let ordered = overview.check_checkout_products().await?;
        Assertion::equals("checkout products", [CHECKOUT_PRODUCT].as_slice(), ordered.as_slice())?;
        overview.check_subtotal().await?;
        overview.click_finish_button().await?;

        let complete = &fx.checkout_complete;
        complete.check_url(&urls.checkout_complete()).await?;
        complete.check_sub_header(ORDER_CONFIRMATION).await
    }
    .boxed()
}
