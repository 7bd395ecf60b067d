//! A scripted copy of the demo shop served through the mock driver

use sauce_probe::mock::{MockDocument, MockElement, MockSite};
use sauce_probe::pages::{SortOption, INVALID_CREDENTIALS_MESSAGE, LOCKED_OUT_MESSAGE};
use sauce_probe::{E2eError, E2eResult, SiteUrls};

pub const STANDARD_USER: &str = "standard_user";
pub const LOCKED_OUT_USER: &str = "locked_out_user";
pub const SECRET: &str = "secret_sauce";
pub const WRONG_SECRET: &str = "not_the_sauce";

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub name: &'static str,
    pub price: f64,
}

pub fn catalog() -> Vec<Product> {
    [
        ("Sauce Labs Backpack", 29.99),
        ("Sauce Labs Bike Light", 9.99),
        ("Sauce Labs Bolt T-Shirt", 15.99),
        ("Sauce Labs Fleece Jacket", 49.99),
        ("Sauce Labs Onesie", 7.99),
        ("Test.allTheThings() T-Shirt (Red)", 15.99),
    ]
    .into_iter()
    .map(|(name, price)| Product { name, price })
    .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Login,
    Inventory,
    Cart,
    CheckoutInfo,
    CheckoutOverview,
    CheckoutComplete,
}

#[derive(Debug, Clone)]
pub struct Storefront {
    urls: SiteUrls,
    screen: Screen,
    logged_in: bool,
    username: String,
    password: String,
    error: Option<String>,
    catalog: Vec<Product>,
    sort: SortOption,
    ignore_sort: bool,
    subtotal_surcharge: f64,
    cart: Vec<&'static str>,
    customer: [String; 3],
}

impl Default for Storefront {
    fn default() -> Self {
        Self::new()
    }
}

impl Storefront {
    pub fn new() -> Self {
        Self {
            urls: SiteUrls::default(),
            screen: Screen::Login,
            logged_in: false,
            username: String::new(),
            password: String::new(),
            error: None,
            catalog: catalog(),
            sort: SortOption::NameAscending,
            ignore_sort: false,
            subtotal_surcharge: 0.0,
            cart: Vec::new(),
            customer: Default::default(),
        }
    }

    pub fn with_catalog(mut self, catalog: Vec<Product>) -> Self {
        self.catalog = catalog;
        self
    }

    /// The dropdown accepts a choice but the list keeps its order
    pub fn with_broken_sort(mut self) -> Self {
        self.ignore_sort = true;
        self
    }

    /// The overview label overstates the item total by `amount`
    pub fn with_subtotal_surcharge(mut self, amount: f64) -> Self {
        self.subtotal_surcharge = amount;
        self
    }

    /// Start on the product listing, already signed in
    pub fn signed_in(mut self) -> Self {
        self.logged_in = true;
        self.screen = Screen::Inventory;
        self
    }

    fn screen_url(&self, screen: Screen) -> String {
        match screen {
            Screen::Login => self.urls.login(),
            Screen::Inventory => self.urls.inventory(),
            Screen::Cart => self.urls.cart(),
            Screen::CheckoutInfo => self.urls.checkout_step_one(),
            Screen::CheckoutOverview => self.urls.checkout_step_two(),
            Screen::CheckoutComplete => self.urls.checkout_complete(),
        }
    }

    fn listed(&self) -> Vec<&Product> {
        let mut listed: Vec<&Product> = self.catalog.iter().collect();
        if self.ignore_sort {
            return listed;
        }
        match self.sort {
            SortOption::NameAscending => listed.sort_by(|a, b| a.name.cmp(b.name)),
            SortOption::NameDescending => listed.sort_by(|a, b| b.name.cmp(a.name)),
            SortOption::PriceAscending => listed.sort_by(|a, b| a.price.total_cmp(&b.price)),
            SortOption::PriceDescending => listed.sort_by(|a, b| b.price.total_cmp(&a.price)),
        }
        listed
    }

    fn price_of(&self, name: &str) -> f64 {
        self.catalog
            .iter()
            .find(|p| p.name == name)
            .map_or(0.0, |p| p.price)
    }

    fn submit_login(&mut self) {
        self.error = None;
        if self.username.is_empty() {
            self.error = Some("Epic sadface: Username is required".to_string());
        } else if self.password != SECRET {
            self.error = Some(INVALID_CREDENTIALS_MESSAGE.to_string());
        } else if self.username == LOCKED_OUT_USER {
            self.error = Some(LOCKED_OUT_MESSAGE.to_string());
        } else if self.username == STANDARD_USER {
            self.logged_in = true;
            self.screen = Screen::Inventory;
        } else {
            self.error = Some(INVALID_CREDENTIALS_MESSAGE.to_string());
        }
    }

    fn cart_badge(&self) -> MockElement {
        let mut link = MockElement::new("a")
            .class("shopping_cart_link")
            .attr("href", "./cart.html")
            .key("cart");
        if !self.cart.is_empty() {
            link = link.child(
                MockElement::new("span")
                    .class("shopping_cart_badge")
                    .text(self.cart.len().to_string()),
            );
        }
        MockElement::new("div")
            .id("shopping_cart_container")
            .child(link)
    }

    fn render_login(&self) -> Vec<MockElement> {
        let mut form = vec![
            MockElement::new("input")
                .attr("type", "text")
                .id("user-name")
                .attr("data-test", "username")
                .key("user-name"),
            MockElement::new("input")
                .attr("type", "password")
                .id("password")
                .attr("data-test", "password")
                .key("password"),
            MockElement::new("input")
                .attr("type", "submit")
                .id("login-button")
                .class("btn_action")
                .attr("value", "LOGIN")
                .key("login"),
        ];
        if let Some(error) = &self.error {
            form.push(
                MockElement::new("h3")
                    .attr("data-test", "error")
                    .child(MockElement::new("button").class("error-button").key("dismiss"))
                    .text(error.clone()),
            );
        }
        vec![MockElement::new("div").class("login_wrapper").children(form)]
    }

    fn render_inventory(&self) -> Vec<MockElement> {
        let sort = MockElement::new("select")
            .class("product_sort_container")
            .key("sort")
            .children(SortOption::ALL.into_iter().map(|o| {
                MockElement::new("option").attr("value", o.label()).text(o.label())
            }));

        let items = self.listed().into_iter().map(|product| {
            let in_cart = self.cart.contains(&product.name);
            let button = if in_cart {
                MockElement::new("button")
                    .class("btn_secondary")
                    .class("btn_inventory")
                    .text("REMOVE")
                    .key(format!("remove:{}", product.name))
            } else {
                MockElement::new("button")
                    .class("btn_primary")
                    .class("btn_inventory")
                    .text("ADD TO CART")
                    .key(format!("add:{}", product.name))
            };
            MockElement::new("div").class("inventory_item").children([
                MockElement::new("div")
                    .class("inventory_item_name")
                    .text(product.name),
                MockElement::new("div").class("pricebar").children([
                    MockElement::new("div")
                        .class("inventory_item_price")
                        .text(format!("${}", product.price)),
                    button,
                ]),
            ])
        });

        vec![
            MockElement::new("div").class("header_container").children([
                self.cart_badge(),
                MockElement::new("div").class("product_label").text("Products"),
                sort,
            ]),
            MockElement::new("div").class("inventory_list").children(items),
        ]
    }

    fn render_cart(&self) -> Vec<MockElement> {
        let items = self.cart.iter().map(|name| {
            MockElement::new("div").class("cart_item").children([
                MockElement::new("div").class("cart_quantity").text("1"),
                MockElement::new("div").class("inventory_item_name").text(*name),
            ])
        });
        vec![
            self.cart_badge(),
            MockElement::new("div").class("cart_list").children(items),
            MockElement::new("a")
                .class("btn_action")
                .class("checkout_button")
                .attr("href", "./checkout-step-one.html")
                .text("CHECKOUT")
                .key("checkout"),
        ]
    }

    fn render_checkout_info(&self) -> Vec<MockElement> {
        let field = |test_id: &str, value: &str| {
            MockElement::new("input")
                .attr("type", "text")
                .attr("data-test", test_id)
                .attr("value", value)
                .key(test_id)
        };
        let mut form = vec![
            field("firstName", &self.customer[0]),
            field("lastName", &self.customer[1]),
            field("postalCode", &self.customer[2]),
        ];
        if let Some(error) = &self.error {
            form.push(MockElement::new("h3").attr("data-test", "error").text(error.clone()));
        }
        vec![
            self.cart_badge(),
            MockElement::new("form").children(form),
            MockElement::new("a")
                .class("cart_cancel_link")
                .attr("href", "./cart.html")
                .text("CANCEL")
                .key("cancel"),
            MockElement::new("input")
                .attr("type", "submit")
                .class("cart_button")
                .attr("value", "CONTINUE")
                .key("continue"),
        ]
    }

    fn render_checkout_overview(&self) -> Vec<MockElement> {
        let items = self.cart.iter().map(|name| {
            MockElement::new("div").class("cart_item").children([
                MockElement::new("div").class("summary_quantity").text("1"),
                MockElement::new("div").class("inventory_item_name").text(*name),
                MockElement::new("div")
                    .class("inventory_item_price")
                    .text(format!("${}", self.price_of(name))),
            ])
        });
        let subtotal: f64 = self.cart.iter().map(|name| self.price_of(name)).sum::<f64>()
            + self.subtotal_surcharge;
        vec![
            self.cart_badge(),
            MockElement::new("div").class("cart_list").children(items),
            MockElement::new("div")
                .class("summary_subtotal_label")
                .text(format!("Item total: ${subtotal:.2}")),
            MockElement::new("a")
                .class("cart_cancel_link")
                .attr("href", "./inventory.html")
                .text("CANCEL")
                .key("cancel"),
            MockElement::new("a")
                .class("cart_button")
                .attr("href", "./checkout-complete.html")
                .text("FINISH")
                .key("finish"),
        ]
    }

    fn render_checkout_complete(&self) -> Vec<MockElement> {
        vec![
            self.cart_badge(),
            MockElement::new("div").id("checkout_complete_container").children([
                MockElement::new("h2")
                    .class("complete-header")
                    .text("THANK YOU FOR YOUR ORDER"),
                MockElement::new("div")
                    .class("complete-text")
                    .text("Your order has been dispatched"),
                MockElement::new("img").class("pony_express").attr("src", "pony.png"),
            ]),
        ]
    }
}

impl MockSite for Storefront {
    fn url(&self) -> String {
        self.screen_url(self.screen)
    }

    fn navigate(&mut self, url: &str) -> E2eResult<()> {
        let screen = [
            Screen::Login,
            Screen::Inventory,
            Screen::Cart,
            Screen::CheckoutInfo,
            Screen::CheckoutOverview,
            Screen::CheckoutComplete,
        ]
        .into_iter()
        .find(|s| self.screen_url(*s) == url)
        .ok_or_else(|| E2eError::Navigation {
            url: url.to_string(),
            message: "404 Not Found".to_string(),
        })?;

        self.error = None;
        if screen == Screen::Login || self.logged_in {
            self.screen = screen;
        } else {
            self.screen = Screen::Login;
            self.error = Some(format!(
                "Epic sadface: You can only access '{url}' when you are logged in."
            ));
        }
        Ok(())
    }

    fn render(&self) -> MockDocument {
        MockDocument::new(match self.screen {
            Screen::Login => self.render_login(),
            Screen::Inventory => self.render_inventory(),
            Screen::Cart => self.render_cart(),
            Screen::CheckoutInfo => self.render_checkout_info(),
            Screen::CheckoutOverview => self.render_checkout_overview(),
            Screen::CheckoutComplete => self.render_checkout_complete(),
        })
    }

    fn click(&mut self, key: &str) -> E2eResult<()> {
        match (self.screen, key) {
            (Screen::Login, "login") => self.submit_login(),
            (Screen::Login, "dismiss") => self.error = None,
            (_, "cart") => self.screen = Screen::Cart,
            (Screen::Inventory, key) => {
                if let Some(name) = key.strip_prefix("add:") {
                    if let Some(product) = self.catalog.iter().find(|p| p.name == name) {
                        self.cart.push(product.name);
                    }
                } else if let Some(name) = key.strip_prefix("remove:") {
                    self.cart.retain(|p| *p != name);
                }
            }
            (Screen::Cart, "checkout") => self.screen = Screen::CheckoutInfo,
            (Screen::CheckoutInfo, "cancel") => self.screen = Screen::Cart,
            (Screen::CheckoutInfo, "continue") => {
                let missing = ["First Name", "Last Name", "Postal Code"]
                    .into_iter()
                    .zip(&self.customer)
                    .find(|(_, value)| value.is_empty());
                match missing {
                    Some((label, _)) => {
                        self.error = Some(format!("Error: {label} is required"));
                    }
                    None => {
                        self.error = None;
                        self.screen = Screen::CheckoutOverview;
                    }
                }
            }
            (Screen::CheckoutOverview, "cancel") => self.screen = Screen::Inventory,
            (Screen::CheckoutOverview, "finish") => {
                self.cart.clear();
                self.screen = Screen::CheckoutComplete;
            }
            _ => {}
        }
        Ok(())
    }

    fn fill(&mut self, key: &str, value: &str) -> E2eResult<()> {
        match key {
            "user-name" => self.username = value.to_string(),
            "password" => self.password = value.to_string(),
            "firstName" => self.customer[0] = value.to_string(),
            "lastName" => self.customer[1] = value.to_string(),
            "postalCode" => self.customer[2] = value.to_string(),
            other => return Err(E2eError::driver(format!("{other} is read-only"))),
        }
        Ok(())
    }

    fn select(&mut self, key: &str, label: &str) -> E2eResult<()> {
        if key != "sort" {
            return Err(E2eError::driver(format!("{key} is not a select")));
        }
        self.sort = label
            .parse()
            .map_err(|_| E2eError::driver(format!("no option labelled {label:?}")))?;
        Ok(())
    }
}
