//! "Apply Filters": product sorting

use crate::assertion::Assertion;
use crate::config::Environment;
use crate::fixture::Fixture;
use crate::harness::{Scenario, Suite, Tag};
use crate::ordering;
use crate::page_object::PageObject;
use crate::pages::SortOption;
use crate::result::E2eResult;
use futures::future::BoxFuture;
use futures::FutureExt;

/// Number of products in the catalogue
pub const CATALOG_SIZE: usize = 6;

/// The suite
#[must_use]
pub fn suite() -> Suite {
    Suite::new("Apply Filters")
        .with_before_each(login_as_standard_user)
        .with_scenario(Scenario::new(
            "Filter Products by Name - Z to A",
            &[Tag::Purchase, Tag::Filter, Tag::Name],
            name_z_to_a,
        ))
        .with_scenario(Scenario::new(
            "Filter Products by Price - Low to High",
            &[Tag::Purchase, Tag::Filter, Tag::Price],
            price_low_to_high,
        ))
}

fn login_as_standard_user<'a>(
    fx: &'a Fixture<'a>,
    env: &'a Environment,
) -> BoxFuture<'a, E2eResult<()>> {
    async move {
        fx.session()
            .step("Login as standard user before filter tests", async {
                fx.login.login(&env.standard_user()).await?;
                fx.login.check_url(&fx.inventory.url()).await
            })
            .await
    }
    .boxed()
}

fn name_z_to_a<'a>(fx: &'a Fixture<'a>, _env: &'a Environment) -> BoxFuture<'a, E2eResult<()>> {
    async move {
        fx.session()
            .step("Filter products by name Z to A and validate", async {
                fx.inventory
                    .select_product_filter(SortOption::NameDescending)
                    .await?;
                let names = fx.inventory.get_product_names().await?;
                Assertion::has_length("product names", &names, CATALOG_SIZE)?;

                let mut sorted = names.clone();
                sorted.sort();
                sorted.reverse();
                Assertion::equals("product names sorted Z to A", &sorted, &names)?;
                Assertion::is_true(
                    ordering::is_descending_by_name(&names),
                    "product order",
                    "names Z to A",
                    || format!("{names:?}"),
                )
            })
            .await
    }
    .boxed()
}

fn price_low_to_high<'a>(
    fx: &'a Fixture<'a>,
    _env: &'a Environment,
) -> BoxFuture<'a, E2eResult<()>> {
    async move {
        fx.session()
            .step("Filter products by price low to high and validate", async {
                fx.inventory
                    .select_product_filter(SortOption::PriceAscending)
                    .await?;
                let prices = fx.inventory.get_product_prices().await?;
                Assertion::has_length("product prices", &prices, CATALOG_SIZE)?;

                for pair in prices.windows(2) {
                    Assertion::less_or_equal("adjacent product prices", pair[0], pair[1])?;
                }
                Ok(())
            })
            .await
    }
    .boxed()
}
