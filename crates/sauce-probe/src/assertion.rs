//! Assertions on values a scenario has already read from the page.
//!
//! Unlike [`Expect`](crate::Expect) these do not poll: they compare data in
//! hand and fail with [`E2eError::AssertionMismatch`].

use crate::result::{E2eError, E2eResult};
use std::fmt::Debug;

/// Assertion helpers for scenarios
#[derive(Debug, Clone, Copy)]
pub struct Assertion;

impl Assertion {
    /// Assert two values are equal
    ///
    /// # Errors
    ///
    /// Returns a mismatch naming `what` if they differ.
    pub fn equals<E, A>(what: &str, expected: &E, actual: &A) -> E2eResult<()>
    where
        E: PartialEq<A> + Debug + ?Sized,
        A: Debug + ?Sized,
    {
        if expected == actual {
            Ok(())
        } else {
            Err(E2eError::mismatch(
                what,
                format!("{expected:?}"),
                format!("{actual:?}"),
            ))
        }
    }

    /// Assert a collection has the expected length
    ///
    /// # Errors
    ///
    /// Returns a mismatch carrying both lengths.
    pub fn has_length<T>(what: &str, collection: &[T], expected: usize) -> E2eResult<()> {
        if collection.len() == expected {
            Ok(())
        } else {
            Err(E2eError::mismatch(
                format!("length of {what}"),
                expected.to_string(),
                collection.len().to_string(),
            ))
        }
    }

    /// Assert `value <= limit`
    ///
    /// # Errors
    ///
    /// Returns a mismatch if `value` exceeds `limit`.
    pub fn less_or_equal<T>(what: &str, value: T, limit: T) -> E2eResult<()>
    where
        T: PartialOrd + Debug,
    {
        if value <= limit {
            Ok(())
        } else {
            Err(E2eError::mismatch(
                what,
                format!("at most {limit:?}"),
                format!("{value:?}"),
            ))
        }
    }

    /// Assert a condition holds
    ///
    /// # Errors
    ///
    /// Returns a mismatch with the given expectation and observation.
    pub fn is_true(
        condition: bool,
        what: &str,
        expected: &str,
        actual: impl FnOnce() -> String,
    ) -> E2eResult<()> {
        if condition {
            Ok(())
        } else {
            Err(E2eError::mismatch(what, expected, actual()))
        }
    }

    /// Assert two floats are approximately equal
    ///
    /// # Errors
    ///
    /// Returns a mismatch if `|expected - actual| >= epsilon`.
    pub fn approx_eq(what: &str, expected: f64, actual: f64, epsilon: f64) -> E2eResult<()> {
        if (expected - actual).abs() < epsilon {
            Ok(())
        } else {
            Err(E2eError::mismatch(
                what,
                format!("{expected} (epsilon {epsilon})"),
                actual.to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equals() {
        assert!(Assertion::equals("cart", &vec!["a"], &vec!["a"]).is_ok());
        let err = Assertion::equals("cart", &vec!["a"], &vec!["b"]).unwrap_err();
        assert_eq!(err.to_string(), r#"cart: expected ["a"], got ["b"]"#);
    }

    #[test]
    fn test_equals_across_types() {
        let expected: &[&str] = &["Sauce Labs Backpack"];
        let actual = vec!["Sauce Labs Backpack".to_string()];
        assert!(Assertion::equals("checkout products", expected, actual.as_slice()).is_ok());
        let empty: Vec<String> = Vec::new();
        assert!(Assertion::equals("checkout products", expected, empty.as_slice()).is_err());
    }

    #[test]
    fn test_has_length() {
        assert!(Assertion::has_length("names", &[1, 2, 3], 3).is_ok());
        let err = Assertion::has_length("names", &[1, 2], 6).unwrap_err();
        assert!(err.to_string().contains("expected 6, got 2"));
    }

    #[test]
    fn test_less_or_equal() {
        assert!(Assertion::less_or_equal("price", 7.99, 9.99).is_ok());
        assert!(Assertion::less_or_equal("price", 9.99, 9.99).is_ok());
        assert!(Assertion::less_or_equal("price", 15.99, 9.99).is_err());
    }

    #[test]
    fn test_is_true_defers_message() {
        assert!(Assertion::is_true(true, "x", "y", || unreachable!()).is_ok());
        let err = Assertion::is_true(false, "order", "descending", || "[b, a]".into()).unwrap_err();
        assert!(err.to_string().contains("got [b, a]"));
    }

    #[test]
    fn test_approx_eq() {
        assert!(Assertion::approx_eq("subtotal", 47.97, 29.99 + 9.99 + 7.99, 0.001).is_ok());
        let err = Assertion::approx_eq("subtotal", 47.97, 48.0, 0.001).unwrap_err();
        assert!(err.to_string().contains("got 48"));
    }
}
