//! Ordering checks over sequences read back from the product list.
//!
//! All checks accept an empty slice.

/// `names` equals its own lexicographic sort, reversed (Z to A)
#[must_use]
pub fn is_descending_by_name<S: AsRef<str>>(names: &[S]) -> bool {
    let actual: Vec<&str> = names.iter().map(AsRef::as_ref).collect();
    let mut expected = actual.clone();
    expected.sort_unstable();
    expected.reverse();
    actual == expected
}

/// `names` equals its own lexicographic sort (A to Z)
#[must_use]
pub fn is_ascending_by_name<S: AsRef<str>>(names: &[S]) -> bool {
    names.windows(2).all(|w| w[0].as_ref() <= w[1].as_ref())
}

/// Every element is `<=` the next one
#[must_use]
pub fn is_non_decreasing<T: PartialOrd>(values: &[T]) -> bool {
    values.windows(2).all(|w| w[0] <= w[1])
}

/// Every element is `>=` the next one
#[must_use]
pub fn is_non_increasing<T: PartialOrd>(values: &[T]) -> bool {
    values.windows(2).all(|w| w[0] >= w[1])
}
