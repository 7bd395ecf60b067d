//! Shared fixtures for the integration tests
#![allow(dead_code)]

pub mod storefront;

use sauce_probe::mock::{MockDriver, MockSessionFactory};
use sauce_probe::wait::WaitPolicy;
use sauce_probe::{Environment, Session, SessionSettings};
use std::sync::Arc;
use std::time::Duration;
use storefront::{Storefront, LOCKED_OUT_USER, SECRET, STANDARD_USER, WRONG_SECRET};

/// Credentials matching the storefront's accounts
pub fn environment() -> Environment {
    Environment::from_lookup(|key| {
        let value = match key {
            sauce_probe::STANDARD_USERNAME => STANDARD_USER,
            sauce_probe::LOCKED_OUT_USERNAME => LOCKED_OUT_USER,
            sauce_probe::PASSWORD => SECRET,
            sauce_probe::INVALID_PASSWORD => WRONG_SECRET,
            _ => return None,
        };
        Some(value.to_string())
    })
    .expect("all keys provided")
}

/// Short waits so failing checks finish quickly
pub fn fast_settings() -> SessionSettings {
    SessionSettings::default()
        .with_wait(WaitPolicy::from_millis(200, 10))
        .with_navigation_timeout(Duration::from_millis(500))
}

pub fn factory<F>(make_site: F) -> MockSessionFactory<F>
where
    F: Fn() -> Storefront + Send + Sync,
{
    MockSessionFactory::new(make_site, fast_settings())
}

/// A session over `site`, with the driver kept for history checks
pub fn session(site: Storefront) -> (Session, Arc<MockDriver>) {
    let driver = Arc::new(MockDriver::new(site));
    let session = Session::new(driver.clone(), fast_settings());
    (session, driver)
}
