//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    500 - 200.1 - 299.9 = 5.684341886080802e-14  ❌ NOT ZERO!            │
//! │                                                                         │
//! │  A customer who paid everything would still show a balance, and the   │
//! │  exact "paid off" check (balance == 0) would never pass.               │
//! │                                                                         │
//! │  OUR SOLUTION: base-10 Decimal                                          │
//! │    500 - 200.1 - 299.9 = 0                                             │
//! │    Pesos (no cents) and dollars (cents) both fit the same type         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bodega_core::money::Money;
//!
//! let price = Money::from_int(150);
//! let line_total = price * 3;             // 450
//! let total = line_total + Money::from_int(50); // 500
//! assert_eq!(total, Money::from_int(500));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in major units (pesos, dollars) with exact decimals.
///
/// ## Design Decisions
/// - **Decimal (signed)**: negative values appear only transiently
///   (balances, profit deltas); ledger entries store magnitudes
/// - **No currency tag**: the currency lives on the record
///   (`Customer::currency`, `ProductDetails::currency`)
/// - **Serde**: serializes as a plain JSON number so the data store
///   keeps the same shape it always had
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product.price ──┬──► CartLine.line_total ──► Cart.total                │
/// │                  │                                                      │
/// │                  └──► ProductSnapshot (fiado) ──► Movement Charge       │
/// │                                                                         │
/// │  Movement entries ──► LedgerSummary { debit, credit, balance }          │
/// │                                                                         │
/// │  ProductDetails.totalProfit ──► InventorySummary ──► Withdrawal check   │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(#[ts(type = "number")] Decimal);

impl Money {
    /// Wraps a decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a Money value from a whole number of major units.
    ///
    /// ## Example
    /// ```rust
    /// use bodega_core::money::Money;
    ///
    /// let debt = Money::from_int(500);
    /// assert!(debt.is_positive());
    /// ```
    #[inline]
    pub fn from_int(units: i64) -> Self {
        Money(Decimal::from(units))
    }

    /// Returns the underlying decimal.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is exactly zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns the absolute value.
    #[inline]
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies money by a unit quantity.
    ///
    /// ## Example
    /// ```rust
    /// use bodega_core::money::Money;
    ///
    /// let unit_profit = Money::from_int(50);
    /// assert_eq!(unit_profit.multiply_quantity(3), Money::from_int(150));
    /// ```
    #[inline]
    pub fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0 * Decimal::from(qty))
    }

    /// Divides by a decimal divisor, `None` on division by zero or overflow.
    ///
    /// Used for unit cost (`package cost / units per package`).
    pub fn checked_div(&self, divisor: Decimal) -> Option<Money> {
        self.0.checked_div(divisor).map(Money)
    }

    /// Rounds to `dp` decimal places (banker's rounding).
    pub fn round_dp(&self, dp: u32) -> Money {
        Money(self.0.round_dp(dp))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows money with two decimals and a `$` sign.
///
/// ## Note
/// This is for logs and error messages. Dashboard figures go through
/// [`crate::numfmt`] for es-VE grouping.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        write!(f, "{}${:.2}", sign, self.0.abs())
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * Decimal::from(qty))
    }
}

/// Multiplication by a decimal factor (exchange rates, package counts).
impl Mul<Decimal> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, factor: Decimal) -> Self {
        Money(self.0 * factor)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_display() {
        assert_eq!(Money::new(dec!(10.99)).to_string(), "$10.99");
        assert_eq!(Money::from_int(5).to_string(), "$5.00");
        assert_eq!(Money::new(dec!(-5.5)).to_string(), "-$5.50");
        assert_eq!(Money::zero().to_string(), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_int(1000);
        let b = Money::from_int(500);

        assert_eq!(a + b, Money::from_int(1500));
        assert_eq!(a - b, Money::from_int(500));
        assert_eq!(a * 3, Money::from_int(3000));
        assert_eq!(-b, Money::from_int(-500));
    }

    #[test]
    fn test_decimal_sums_reach_exact_zero() {
        // Binary floats leave a residue here; Decimal must not.
        let balance = Money::from_int(500) - Money::new(dec!(200.1)) - Money::new(dec!(299.9));
        assert!(balance.is_zero());
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_int(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.abs(), Money::from_int(100));
    }

    #[test]
    fn test_sum_and_quantity() {
        let lines = [Money::from_int(150), Money::from_int(50)];
        let total: Money = lines.iter().sum();
        assert_eq!(total, Money::from_int(200));
        assert_eq!(Money::new(dec!(2.5)).multiply_quantity(4), Money::from_int(10));
    }

    #[test]
    fn test_checked_div() {
        let unit = Money::from_int(20500).checked_div(dec!(12)).unwrap();
        assert_eq!(unit.round_dp(2), Money::new(dec!(1708.33)));
        assert!(Money::from_int(1).checked_div(Decimal::ZERO).is_none());
    }

    #[test]
    fn test_json_is_a_plain_number() {
        let json = serde_json::to_string(&Money::new(dec!(12.5))).unwrap();
        assert_eq!(json, "12.5");
        let back: Money = serde_json::from_str("12.5").unwrap();
        assert_eq!(back, Money::new(dec!(12.5)));
    }
}
