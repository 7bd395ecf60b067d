//! Per-scenario page object fixture.
//!
//! A fixture is built fresh for every scenario from that scenario's own
//! session and dropped when the scenario ends, so no page state carries
//! over between scenarios.

use crate::pages::{
    CheckoutCompletePage, CheckoutInfoPage, CheckoutOverviewPage, InventoryPage, LoginPage,
};
use crate::session::Session;

/// All five page objects over one session
#[derive(Debug)]
pub struct Fixture<'s> {
    session: &'s Session,
    /// Login screen
    pub login: LoginPage<'s>,
    /// Product listing and cart
    pub inventory: InventoryPage<'s>,
    /// Checkout step one
    pub checkout_info: CheckoutInfoPage<'s>,
    /// Checkout step two
    pub checkout_overview: CheckoutOverviewPage<'s>,
    /// Order confirmation
    pub checkout_complete: CheckoutCompletePage<'s>,
}

impl<'s> Fixture<'s> {
    /// Build every page object over `session`
    #[must_use]
    pub fn new(session: &'s Session) -> Self {
        Self {
            session,
            login: LoginPage::new(session),
            inventory: InventoryPage::new(session),
            checkout_info: CheckoutInfoPage::new(session),
            checkout_overview: CheckoutOverviewPage::new(session),
            checkout_complete: CheckoutCompletePage::new(session),
        }
    }

    /// The underlying session
    #[must_use]
    pub fn session(&self) -> &'s Session {
        self.session
    }
}
