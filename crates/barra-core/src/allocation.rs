//! # Breakdown Allocation
//!
//! Splits the suggested price across the five breakdown buckets.
//!
//! ## Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  pure[c]   cost that belongs to bucket c alone (bottles, garnish, ...)  │
//! │  common    staff + ice + water, shared by every bucket                  │
//! │                                                                         │
//! │  line[c] = (pure[c] + common × pure[c] / Σpure) × profit_factor        │
//! │            (0 when pure[c] is 0)                                        │
//! │                                                                         │
//! │  diff = suggested − Σline                                               │
//! │  |diff| > 0.10 → the largest line absorbs all of diff                  │
//! │                  (ties: first in BarCategory::ALL order)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! After the correction the breakdown sums to the suggested price within
//! [`RECONCILIATION_TOLERANCE`].

use rust_decimal::Decimal;

use crate::money::Money;
use crate::types::{BarCategory, PerCategory};

/// Largest gap tolerated between the breakdown sum and the suggested price.
pub const RECONCILIATION_TOLERANCE: Money = Money::from_cents(10);

/// Allocates `suggested` over the buckets in proportion to their pure cost.
///
/// ## Example
/// ```rust
/// use barra_core::allocation::allocate_breakdown;
/// use barra_core::money::Money;
/// use barra_core::types::PerCategory;
/// use rust_decimal::Decimal;
///
/// let mut pure = PerCategory::default();
/// pure.beer = Money::from_units(300);
/// pure.national_liquor = Money::from_units(100);
///
/// let breakdown = allocate_breakdown(
///     &pure,
///     Money::from_units(100),
///     Decimal::new(2, 0),
///     Money::from_units(1000),
/// );
/// assert_eq!(breakdown.beer, Money::from_units(750));
/// assert_eq!(breakdown.national_liquor, Money::from_units(250));
/// assert_eq!(breakdown.total(), Money::from_units(1000));
/// ```
pub fn allocate_breakdown(
    pure: &PerCategory<Money>,
    common: Money,
    profit_factor: Decimal,
    suggested: Money,
) -> PerCategory<Money> {
    let pure_total = pure.total();
    let denominator = if pure_total.is_zero() {
        Decimal::ONE
    } else {
        pure_total.to_decimal()
    };
    let common = common.to_decimal();

    let mut breakdown = PerCategory::from_fn(|category| {
        let own = pure[category];
        if !own.is_positive() {
            return Money::zero();
        }
        let own = own.to_decimal();
        let share = own / denominator;
        Money::from_decimal((own + common * share) * profit_factor)
    });

    let diff = suggested - breakdown.total();
    if diff.abs() > RECONCILIATION_TOLERANCE {
        let largest = largest_bucket(&breakdown);
        breakdown[largest] += diff;
    }

    breakdown
}

/// The bucket with the largest value; the first one wins a tie.
pub fn largest_bucket(values: &PerCategory<Money>) -> BarCategory {
    let mut best = BarCategory::ALL[0];
    for (category, value) in values.iter() {
        if *value > values[best] {
            best = category;
        }
    }
    best
}

// =============================================================================
// Unit Tests
// =============================================================================
