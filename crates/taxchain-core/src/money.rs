//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A chain of percentage rules multiplies that error at every step,      │
//! │  and the inclusive solver compares totals for EXACT equality.          │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Every amount is an i64 number of cents. The only rounding point     │
//! │    is `percent_of`, which rounds half-up to the nearest cent.          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use taxchain_core::money::Money;
//! use taxchain_core::rate::TaxRate;
//!
//! let base = Money::from_cents(10000); // 100.00
//! let tax = base.percent_of(TaxRate::from_bps(750)).unwrap();
//! assert_eq!(tax.cents(), 750);
//! assert_eq!(format!("{}", base + tax), "107.50");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use crate::rate::TaxRate;

/// Basis points in 100%.
const BPS_SCALE: i128 = 10_000;

/// Half of [`BPS_SCALE`]; added before division to round half-up.
const BPS_HALF: i128 = 5_000;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: intermediate solver differences can be negative, and
///   validation (not the type) decides where negatives are rejected
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Serde transparent**: serializes as a bare integer of cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use taxchain_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion, truncated toward zero.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
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

    /// Returns the absolute value, saturating at `i64::MAX` cents.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.saturating_abs())
    }

    /// Checked addition. Returns `None` if the sum leaves the i64 cent range.
    #[inline]
    pub const fn checked_add(self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Checked subtraction. Returns `None` on overflow.
    #[inline]
    pub const fn checked_sub(self, other: Money) -> Option<Money> {
        match self.0.checked_sub(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Computes `rate` percent of this amount, rounded half-up to the cent.
    ///
    /// Returns `None` when the rounded result does not fit in i64 cents
    /// (only possible for rates above 100%).
    ///
    /// ## Rounding Rule
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  ROUND HALF-UP AT THE CENT BOUNDARY                                 │
    /// │                                                                     │
    /// │  (amount_cents × bps + 5000) / 10000                                │
    /// │                                                                     │
    /// │  10000 × 750 bps  = 7 500 000  → 750.00 → 750 cents                 │
    /// │      1 × 5000 bps =     5 000  →   0.50 →   1 cent (half goes up)   │
    /// │   9999 × 1000 bps = 9 999 000  → 999.90 → 1000 cents                │
    /// │                                                                     │
    /// │  This is the ONLY rounding rule: the applicator and the solver     │
    /// │  seed both go through here.                                        │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// Division truncates toward zero, so a negative amount (which only the
    /// solver seed can produce) rounds the same way integer division does.
    ///
    /// ## Example
    /// ```rust
    /// use taxchain_core::money::Money;
    /// use taxchain_core::rate::TaxRate;
    ///
    /// let half_cent = Money::from_cents(1).percent_of(TaxRate::from_bps(5000));
    /// assert_eq!(half_cent, Some(Money::from_cents(1)));
    /// ```
    pub fn percent_of(&self, rate: TaxRate) -> Option<Money> {
        // i128 keeps amount × bps from overflowing on large invoices
        let cents = (self.0 as i128 * rate.bps() as i128 + BPS_HALF) / BPS_SCALE;
        i64::try_from(cents).ok().map(Money)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders cents as `dollars.cents` without a currency symbol.
///
/// ## Example
/// ```rust
/// use taxchain_core::money::Money;
///
/// assert_eq!(Money::from_cents(12345).to_string(), "123.45");
/// assert_eq!(Money::from_cents(5).to_string(), "0.05");
/// assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
/// ```
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}{}.{:02}",
            sign,
            self.dollars().abs(),
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

/// Summing an iterator of amounts (invoice totals).
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
