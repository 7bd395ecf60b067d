//! Property tests for the ordering checks
#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;
use sauce_probe::ordering::{
    is_ascending_by_name, is_descending_by_name, is_non_decreasing, is_non_increasing,
};
use sauce_probe::pages::SortOption;

fn names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[A-Za-z .()-]{0,24}", 0..12)
}

fn prices() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec((0u32..100_000).prop_map(|cents| f64::from(cents) / 100.0), 0..12)
}

proptest! {
    #[test]
    fn prop_sorted_then_reversed_is_descending(mut list in names()) {
        list.sort();
        list.reverse();
        prop_assert!(is_descending_by_name(&list));
        prop_assert!(SortOption::NameDescending.verify_names(&list));
    }

    #[test]
    fn prop_sorted_is_ascending(mut list in names()) {
        list.sort();
        prop_assert!(is_ascending_by_name(&list));
        list.reverse();
        prop_assert!(is_descending_by_name(&list));
    }

    #[test]
    fn prop_descending_check_matches_definition(list in names()) {
        let mut expected = list.clone();
        expected.sort();
        expected.reverse();
        prop_assert_eq!(is_descending_by_name(&list), expected == list);
    }

    #[test]
    fn prop_sorted_prices_are_non_decreasing(mut list in prices()) {
        list.sort_by(f64::total_cmp);
        prop_assert!(is_non_decreasing(&list));
        prop_assert!(SortOption::PriceAscending.verify_prices(&list));
        list.reverse();
        prop_assert!(is_non_increasing(&list));
    }

    #[test]
    fn prop_swapping_an_ascending_pair_breaks_order(list in prices(), index in 0usize..11) {
        let mut list = list;
        list.sort_by(f64::total_cmp);
        list.dedup();
        prop_assume!(index + 1 < list.len());
        list.swap(index, index + 1);
        prop_assert!(!is_non_decreasing(&list));
    }
}

#[test]
fn test_empty_sequences_are_ordered() {
    let empty: Vec<String> = Vec::new();
    assert!(is_descending_by_name(&empty));
    assert!(is_ascending_by_name(&empty));
    assert!(is_non_decreasing::<f64>(&[]));
    assert!(is_non_increasing::<f64>(&[]));
}
