//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Exact Decimals?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  THE EARLY ROUNDING PROBLEM                                             │
//! │    Tax $1.00 split over 3 items, rounded per person:                    │
//! │    $0.33 + $0.33 + $0.33 = $0.99    → Lost $0.01!                       │
//! │                                                                         │
//! │  OUR SOLUTION: Exact base-10 decimals, rounded only for display         │
//! │    1.00 / 3 = 0.3333333333333333333333333333 (28 digits)               │
//! │    Shares are accumulated unrounded, `Display` rounds to cents         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tabsplit_core::money::Money;
//!
//! // Create from cents (preferred for literals)
//! let price = Money::from_cents(1099); // $10.99
//!
//! // Arithmetic operations
//! let total = price + Money::from_cents(500); // $15.99
//! assert_eq!(total.to_string(), "$15.99");
//!
//! // NEVER do this:
//! // let bad = Money::from_float(10.99); // NO SUCH METHOD EXISTS!
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

/// Number of decimal places shown to people.
pub const DISPLAY_DECIMAL_PLACES: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value as an exact decimal amount of the bill's currency.
///
/// ## Design Decisions
/// - **Decimal, not cents**: tax and tip shares are fractions of a cent
///   until the moment they are shown; keeping them exact means per-person
///   shares always add back up to the bill total
/// - **Single field tuple struct**: Zero-cost abstraction over `Decimal`
/// - **Serialized as a decimal string**: `"12.34"`, never a float
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  OCR text "Coffee 3.50" ──► LineItem.price ──► BillState.subtotal()     │
/// │                                                      │                  │
/// │            ChargeSetting (10% / $3.00) ──► tax_amount │                  │
/// │                                                      ▼                  │
/// │                               PersonShare { subtotal, tax, tip, total } │
/// │                                                      │                  │
/// │                                   Displayed as "$4.25" (rounded here)   │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(Decimal);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use tabsplit_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, DISPLAY_DECIMAL_PLACES))
    }

    /// Wraps an exact decimal amount.
    #[inline]
    pub const fn from_decimal(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Parses a plain decimal string such as `"12.34"`.
    ///
    /// Returns `None` for anything that is not a finite decimal number
    /// (including digit runs too long to represent).
    pub fn parse(text: &str) -> Option<Self> {
        Decimal::from_str(text.trim()).ok().map(Money)
    }

    /// Returns the exact, unrounded amount.
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

    /// Returns `pct` percent of this amount, unrounded.
    ///
    /// Computed as `(pct / 100) * amount`, the Percentage-mode formula.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use tabsplit_core::money::Money;
    ///
    /// let subtotal = Money::from_cents(10000); // $100.00
    /// let tip = subtotal.percent_of(Decimal::new(18, 0));
    /// assert_eq!(tip, Money::from_cents(1800));
    /// ```
    pub fn percent_of(&self, pct: Decimal) -> Money {
        Money(pct / Decimal::ONE_HUNDRED * self.0)
    }

    /// Expresses this amount as a percentage of `base`.
    ///
    /// A zero base, or a ratio too large to represent, yields 0.
    pub fn as_percent_of(&self, base: Money) -> Decimal {
        if base.is_zero() {
            return Decimal::ZERO;
        }
        self.0
            .checked_div(base.0)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .unwrap_or(Decimal::ZERO)
    }

    /// Adds `other`, or returns `None` if the sum is not representable.
    #[inline]
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Allocates `count` out of `total` equal shares of this amount.
    ///
    /// ## Formula
    /// `(amount / total) * count`, in that order and unrounded. This is the
    /// item-count allocation used for tax and tip: a person holding 2 of 5
    /// items receives 2/5 of the charge regardless of what the items cost.
    ///
    /// A `total` of zero yields zero; empty bills are rejected before any
    /// allocation happens.
    ///
    /// ## Example
    /// ```rust
    /// use tabsplit_core::money::Money;
    ///
    /// let tax = Money::from_cents(300); // $3.00
    /// assert_eq!(tax.share_by_count(1, 2), Money::from_cents(150));
    /// assert_eq!(tax.share_by_count(0, 2), Money::zero());
    /// ```
    pub fn share_by_count(&self, count: usize, total: usize) -> Money {
        if total == 0 {
            return Money::zero();
        }
        Money(self.0 / Decimal::from(total as u64) * Decimal::from(count as u64))
    }

    /// Rounds to cents, midpoint away from zero.
    ///
    /// ## Note
    /// Only presentation code should call this. Sums of rounded shares do not
    /// in general equal the rounded total.
    pub fn rounded(&self) -> Money {
        let mut amount = self
            .0
            .round_dp_with_strategy(DISPLAY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
        amount.rescale(DISPLAY_DECIMAL_PLACES);
        Money(amount)
    }

    /// Returns the value in cents after display rounding.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use tabsplit_core::money::Money;
    ///
    /// let third = Money::from_decimal(Decimal::ONE / Decimal::from(3));
    /// assert_eq!(third.cents(), 33);
    /// ```
    pub fn cents(&self) -> i64 {
        let rounded = self.rounded().0;
        // After rescale(2) the mantissa is the amount in cents.
        rounded.mantissa() as i64
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display rounds to cents and prefixes the currency sign.
///
/// ## Note
/// Rounding happens here and only here, so intermediate totals never
/// accumulate per-person rounding error.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.rounded();
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

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
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
