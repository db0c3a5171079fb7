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
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Quotation lines need fractional quantities (1.5 hours × $80.00)       │
//! │  and fractional percentages (8.25% tax), so integer cents alone        │
//! │  are not enough.                                                       │
//! │                                                                         │
//! │  OUR SOLUTION: Base-10 fixed point (rust_decimal)                       │
//! │    Intermediate products keep full precision                           │
//! │    Every emitted amount is rounded ONCE to 2 places                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use quote_core::money::Money;
//!
//! // Create from cents (preferred for literals)
//! let price = Money::from_cents(1099); // $10.99
//!
//! // Arithmetic operations
//! let total = price + Money::from_cents(500); // $15.99
//! assert_eq!(total, Money::from_cents(1599));
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use crate::CURRENCY_DECIMAL_PLACES;

/// One hundred, the percentage denominator.
const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the major currency unit (dollars for USD).
///
/// ## Design Decisions
/// - **Decimal (signed)**: subtraction may legitimately go negative in
///   intermediate steps; validation keeps emitted line values non-negative
/// - **Transparent serde**: serialized as the bare decimal string `"189.00"`
/// - **Unrounded until asked**: `round()` is the single rounding point
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  LineItem.unit_price ──► base ──► discount ──► taxable base ──► taxes  │
/// │                                                                         │
/// │  LineTotals ──► DocumentTotals ──► QuotationSubmission ──► print/PDF   │
/// │                                                                         │
/// │  EVERY monetary value in the workspace flows through this type         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use quote_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.to_string(), "$10.99");
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, CURRENCY_DECIMAL_PLACES))
    }

    /// Wraps an arbitrary decimal amount. No rounding is applied.
    #[inline]
    pub const fn from_decimal(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Returns the underlying decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
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

    /// Rounds to currency precision (2 places), half away from zero.
    ///
    /// ## Rounding Rule
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  ROUND HALF AWAY FROM ZERO                                          │
    /// │                                                                     │
    /// │   4.995  → 5.00       0.825 → 0.83       0.8249 → 0.82             │
    /// │                                                                     │
    /// │  The result is always rescaled to exactly 2 places, so 200 is      │
    /// │  emitted as "200.00". Two calls on the same input are              │
    /// │  bit-identical, which is what makes recomputation idempotent.      │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// ## Example
    /// ```rust
    /// use quote_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let raw = Money::from_decimal(Decimal::new(4995, 3)); // 4.995
    /// assert_eq!(raw.round().to_string(), "$5.00");
    /// ```
    pub fn round(&self) -> Money {
        let mut rounded = self
            .0
            .round_dp_with_strategy(CURRENCY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(CURRENCY_DECIMAL_PLACES);
        Money(rounded)
    }

    /// Checks whether the value already sits on currency precision.
    pub fn is_rounded(&self) -> bool {
        self.0.normalize().scale() <= CURRENCY_DECIMAL_PLACES
    }

    /// Multiplies money by a (possibly fractional) quantity.
    ///
    /// Returns `None` when the product does not fit in a `Decimal`.
    ///
    /// ## Example
    /// ```rust
    /// use quote_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let hourly = Money::from_cents(8000); // $80.00
    /// let line = hourly.checked_multiply_quantity(Decimal::new(15, 1)); // 1.5 hours
    /// assert_eq!(line, Some(Money::from_cents(12000)));
    /// assert_eq!(hourly.checked_multiply_quantity(Decimal::MAX), None);
    /// ```
    #[inline]
    pub fn checked_multiply_quantity(&self, qty: Decimal) -> Option<Money> {
        self.0.checked_mul(qty).map(Money)
    }

    /// Returns `percentage`% of this amount, unrounded.
    ///
    /// `percentage` is expressed in percent, so `5` means 5%. Returns `None`
    /// on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use quote_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let base = Money::from_cents(20000); // $200.00
    /// let ten_percent = base.checked_percentage_of(Decimal::TEN);
    /// assert_eq!(ten_percent, Some(Money::from_cents(2000)));
    /// ```
    #[inline]
    pub fn checked_percentage_of(&self, percentage: Decimal) -> Option<Money> {
        self.0
            .checked_mul(percentage)
            .and_then(|scaled| scaled.checked_div(HUNDRED))
            .map(Money)
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub fn checked_add(&self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Sums amounts, `None` as soon as the running total overflows.
    ///
    /// Operator `+` and `Sum` panic on overflow; totals built from
    /// caller-supplied quantities and prices go through this instead.
    pub fn checked_sum<I: IntoIterator<Item = Money>>(amounts: I) -> Option<Money> {
        amounts
            .into_iter()
            .try_fold(Money::zero(), |acc, m| acc.checked_add(m))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for debugging and logs. Locale-aware currency formatting
/// belongs to the presentation layer.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.round();
        let sign = if rounded.is_negative() { "-" } else { "" };
        write!(f, "{}${}", sign, rounded.0.abs())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
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

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
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
