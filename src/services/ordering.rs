//! Order-number defaults
//!
//! New sequences/sessions/steps get `max(sibling orders) + 1` pre-filled in
//! the create form. This is a convenience heuristic, not a unique sequence:
//! two concurrent operators could race and collide, which is accepted for a
//! single-operator admin tool.

/// Next order number after the given sibling orders; `1` when there are no
/// siblings yet.
pub fn next_order(orders: impl IntoIterator<Item = i64>) -> i64 {
    orders.into_iter().max().unwrap_or(0) + 1
}

#[cfg(test)]
mod tests {
    use super::next_order;
    use proptest::prelude::*;

    #[test]
    fn next_after_unsorted_siblings() {
        assert_eq!(next_order([1, 3, 2]), 4);
    }

    #[test]
    fn first_child_starts_at_one() {
        assert_eq!(next_order([]), 1);
    }

    #[test]
    fn gaps_are_not_filled() {
        assert_eq!(next_order([1, 10]), 11);
    }

    proptest! {
        #[test]
        fn always_one_past_the_maximum(orders in proptest::collection::vec(0i64..10_000, 1..32)) {
            let max = *orders.iter().max().unwrap();
            prop_assert_eq!(next_order(orders), max + 1);
        }
    }
}
