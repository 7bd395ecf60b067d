//! Page objects for the five storefront screens.

mod checkout_complete;
mod checkout_info;
mod checkout_overview;
mod inventory;
mod login;

pub use checkout_complete::{CheckoutCompleteElements, CheckoutCompletePage, ORDER_CONFIRMATION};
pub use checkout_info::{CheckoutInfoElements, CheckoutInfoPage, Customer};
pub use checkout_overview::{
    order_subtotal, parse_quantity, parse_subtotal, CheckoutOverviewElements, CheckoutOverviewPage,
};
pub use inventory::{parse_price, InventoryElements, InventoryPage, SortOption};
pub use login::{LoginElements, LoginPage, INVALID_CREDENTIALS_MESSAGE, LOCKED_OUT_MESSAGE};
