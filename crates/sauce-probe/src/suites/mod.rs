//! The shipped suites.

pub mod checkout;
pub mod filters;
pub mod login;

use crate::harness::Suite;

/// Every suite, in the order they run
#[must_use]
pub fn all() -> Vec<Suite> {
    vec![filters::suite(), checkout::suite(), login::suite()]
}

/// Suites whose name equals one of `names` (case-insensitive), in run order
#[must_use]
pub fn named(names: &[String]) -> Vec<Suite> {
    all()
        .into_iter()
        .filter(|suite| names.iter().any(|n| n.eq_ignore_ascii_case(&suite.name)))
        .collect()
}
