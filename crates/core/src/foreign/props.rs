//! Property-based tests for foreign expense conversion.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::conversion::{ConversionError, ForeignConversion};
use super::types::ForeignExpenseItem;

/// Strategy to generate item amounts (0.00 to 1,000,000.00).
fn item_amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate positive exchange rates (0.0001 to 10000.0000).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

fn items() -> impl Strategy<Value = Vec<ForeignExpenseItem>> {
    prop::collection::vec(item_amount(), 0..8).prop_map(|amounts| {
        amounts
            .into_iter()
            .enumerate()
            .map(|(i, amount)| ForeignExpenseItem::new(format!("line {i}"), amount))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The foreign total is the plain sum of the items.
    #[test]
    fn prop_total_foreign_is_sum(items in items(), rate in positive_rate()) {
        let result = ForeignConversion::compute(&items, rate).unwrap();
        let sum: Decimal = items.iter().map(|item| item.amount).sum();
        prop_assert_eq!(result.total_foreign, sum);
    }

    /// The primary total has at most 4 decimals and is within half a unit
    /// of the last place from the exact quotient.
    #[test]
    fn prop_total_primary_is_rounded_quotient(items in items(), rate in positive_rate()) {
        let result = ForeignConversion::compute(&items, rate).unwrap();
        let exact = result.total_foreign / rate;

        prop_assert!(result.total_primary.scale() <= 4);
        prop_assert!((result.total_primary - exact).abs() <= Decimal::new(5, 5));
        prop_assert!(!result.total_primary.is_sign_negative() || result.total_primary.is_zero());
    }

    /// Any non-positive rate is rejected.
    #[test]
    fn prop_non_positive_rate_rejected(items in items(), raw in -100_000_000i64..=0) {
        let rate = Decimal::new(raw, 4);
        prop_assert_eq!(
            ForeignConversion::compute(&items, rate),
            Err(ConversionError::InvalidRate(rate))
        );
    }
}
