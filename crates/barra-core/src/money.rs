//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Drink counts are real-valued (750 × 55 / 90 = 458.333…).              │
//! │  Multiplying them straight into a float price accumulates cent drift,  │
//! │  and the breakdown must reconcile against the total.                   │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Quantities stay f64, every amount becomes cents exactly once:       │
//! │    quantity × unit cost → Decimal → round half-up → i64 cents          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use barra_core::money::Money;
//!
//! // Create from cents (preferred)
//! let mixer = Money::from_cents(2200); // $22.00
//!
//! // 58.333 liters of mixer at $22.00 → $1283.33
//! let cost = mixer.times_quantity(58.333_333);
//! assert_eq!(cost.cents(), 128_333);
//! ```

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

/// Number of decimal places kept for currency.
pub const CURRENCY_DECIMALS: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in cents (centavos).
///
/// ## Design Decisions
/// - **i64 (signed)**: the reconciliation remainder can be negative
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  CatalogItem.unit_cost ──► resolve_cost() ──► unit cost per resource    │
/// │                                                    │                    │
/// │                         bottles × unit ◄───────────┘                    │
/// │                                │                                        │
/// │  total_cost ──► × profit factor ──► suggested_price ──► line item       │
/// │                                                                         │
/// │  EVERY monetary value in the estimate flows through this type           │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use barra_core::money::Money;
    ///
    /// let ice_bag = Money::from_cents(9000); // $90.00
    /// assert_eq!(ice_bag.cents(), 9000);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole currency units.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units * 100)
    }

    /// Converts a decimal amount to cents, rounding half away from zero.
    ///
    /// ## Example
    /// ```rust
    /// use barra_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let m = Money::from_decimal(Decimal::new(12_345, 3)); // 12.345
    /// assert_eq!(m.cents(), 1235);
    ///
    /// let n = Money::from_decimal(Decimal::new(-12_345, 3));
    /// assert_eq!(n.cents(), -1235);
    /// ```
    pub fn from_decimal(amount: Decimal) -> Self {
        let Some(cents) = amount.checked_mul(Decimal::ONE_HUNDRED) else {
            return Money::saturated(amount.is_sign_negative());
        };
        let cents = cents.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        // Saturate instead of wrapping on absurd inputs
        match cents.to_i64() {
            Some(cents) => Money(cents),
            None => Money::saturated(cents.is_sign_negative()),
        }
    }

    /// Prices `count` units at an exact unit cost, rounding to cents once.
    ///
    /// ## Example
    /// ```rust
    /// use barra_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// // A $1000 case yielding 3 bottles, 47 bottles needed
    /// let unit = Decimal::from(1000) / Decimal::from(3);
    /// assert_eq!(Money::for_count(unit, 47).cents(), 1_566_667);
    /// ```
    pub fn for_count(unit_cost: Decimal, count: u64) -> Self {
        Money::extend(unit_cost, Decimal::from(count))
    }

    /// Prices a real-valued quantity (liters, drinks) at an exact unit cost.
    pub fn for_quantity(unit_cost: Decimal, quantity: f64) -> Self {
        Money::extend(unit_cost, to_decimal(quantity))
    }

    fn extend(unit_cost: Decimal, quantity: Decimal) -> Self {
        match unit_cost.checked_mul(quantity) {
            Some(amount) => Money::from_decimal(amount),
            None => Money::saturated(unit_cost.is_sign_negative() != quantity.is_sign_negative()),
        }
    }

    const fn saturated(negative: bool) -> Self {
        if negative {
            Money(i64::MIN)
        } else {
            Money(i64::MAX)
        }
    }

    /// Returns the amount as an exact decimal (e.g. `1099` → `10.99`).
    #[inline]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, CURRENCY_DECIMALS)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-units portion.
    #[inline]
    pub const fn whole_units(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies a unit price by a whole count (bottles, bags, people).
    ///
    /// ## Example
    /// ```rust
    /// use barra_core::money::Money;
    ///
    /// let bottle = Money::from_units(380);
    /// assert_eq!(bottle.times(19), Money::from_units(7220));
    /// ```
    #[inline]
    pub const fn times(&self, count: u64) -> Self {
        let count = if count > i64::MAX as u64 {
            i64::MAX
        } else {
            count as i64
        };
        Money(self.0.saturating_mul(count))
    }

    /// Multiplies a unit price by a real-valued quantity (drinks, liters).
    ///
    /// The product is rounded to cents once, half away from zero.
    pub fn times_quantity(&self, quantity: f64) -> Self {
        Money::for_quantity(self.to_decimal(), quantity)
    }

    /// Multiplies by a decimal factor (profit factor, allocation share).
    ///
    /// ## Example
    /// ```rust
    /// use barra_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let cost = Money::from_cents(1001);
    /// assert_eq!(cost.scale(Decimal::new(13, 1)).cents(), 1301); // 13.013 → 13.01
    /// ```
    pub fn scale(&self, factor: Decimal) -> Self {
        Money::extend(self.to_decimal(), factor)
    }
}

/// Converts a real-valued quantity to a decimal for money math.
///
/// Quantities come from validated guest counts and rate tables, so a
/// non-finite value means a bug upstream; it is logged and treated as zero.
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite quantity in money calculation, using zero");
        Decimal::ZERO
    })
}

/// Parses a decimal stored as text (catalog yields, fallback constants).
///
/// ## Example
/// ```rust
/// use barra_core::money::parse_decimal;
///
/// assert_eq!(parse_decimal("value", " 90.00 ").unwrap().to_string(), "90.00");
/// assert!(parse_decimal("value", "noventa").is_err());
/// ```
pub fn parse_decimal(field: &str, value: &str) -> CoreResult<Decimal> {
    Decimal::from_str(value.trim()).map_err(|_| CoreError::InvalidDecimal {
        field: field.to_string(),
        value: value.to_string(),
    })
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display as currency (e.g., "$10.99").
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.whole_units().abs(),
            self.cents_part()
        )
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

/// Multiplication by a whole count.
impl Mul<u64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, count: u64) -> Self {
        self.times(count)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.whole_units(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_units(7220)), "$7220.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::zero()), "$0.00");
    }

    #[test]
    fn test_from_decimal_rounds_half_up() {
        assert_eq!(Money::from_decimal(Decimal::new(5, 3)).cents(), 1); // 0.005
        assert_eq!(Money::from_decimal(Decimal::new(4, 3)).cents(), 0); // 0.004
        assert_eq!(Money::from_decimal(Decimal::new(-5, 3)).cents(), -1);
        assert_eq!(Money::from_decimal(Decimal::new(1_283_333, 3)).cents(), 128_333);
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);

        let total: Money = [a, b, b].iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_times_quantity() {
        // 291.666… drinks × $15.00 garnish
        let garnish = Money::from_units(15);
        assert_eq!(garnish.times_quantity(750.0 * 35.0 / 90.0).cents(), 437_500);
        assert_eq!(garnish.times_quantity(0.0), Money::zero());
    }

    #[test]
    fn test_scale() {
        let cost = Money::from_units(100);
        assert_eq!(cost.scale(Decimal::new(13, 1)), Money::from_units(130));
        assert_eq!(cost.scale(Decimal::ZERO), Money::zero());
        assert_eq!(Money::from_cents(1001).scale(Decimal::new(13, 1)).cents(), 1301);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.abs().cents(), 100);
    }

    #[test]
    fn test_exact_unit_cost_rounds_after_multiplying() {
        let third = Decimal::from(1000) / Decimal::from(3);
        assert_eq!(Money::for_count(third, 47), Money::from_cents(1_566_667));
        assert_eq!(Money::for_count(third, 0), Money::zero());
        // A $22 pack yielding 12 liters, 60 liters needed
        let mixer = Decimal::from(22) / Decimal::from(12);
        assert_eq!(Money::for_quantity(mixer, 60.0), Money::from_units(110));
    }

    #[test]
    fn test_overflow_saturates() {
        let bottle = Money::from_units(42);
        assert_eq!(bottle.times(u64::MAX).cents(), i64::MAX);
        assert_eq!(bottle.times(3_000_000_000_000_000).cents(), i64::MAX);
        assert_eq!((Money::from_cents(i64::MAX) + bottle).cents(), i64::MAX);
        assert_eq!((Money::from_cents(i64::MIN) - bottle).cents(), i64::MIN);

        let mut total = Money::from_cents(i64::MAX - 1);
        total += bottle;
        assert_eq!(total.cents(), i64::MAX);

        assert_eq!(Money::for_count(Decimal::MAX, 10).cents(), i64::MAX);
        assert_eq!(Money::from_decimal(Decimal::MIN).cents(), i64::MIN);
        assert_eq!(Money::from_cents(i64::MAX).scale(Decimal::new(13, 1)).cents(), i64::MAX);
    }

    #[test]
    fn test_non_finite_quantity_is_zero() {
        assert_eq!(to_decimal(f64::NAN), Decimal::ZERO);
        assert_eq!(Money::from_units(5).times_quantity(f64::INFINITY), Money::zero());
    }
}
