//! # Money
//!
//! Line amounts and invoice totals as whole cents. Unit rates, quantities
//! and percentages stay `Decimal` until a line amount is rounded.
//!
//! ## Rounding Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  quantity × rate × (1 − discount/100)   ──►  exact Decimal product     │
//! │                                                    │                    │
//! │                     round ONCE, 2 places, half away from zero           │
//! │                                                    ▼                    │
//! │                                            Money (i64 cents)            │
//! │                                                                         │
//! │  Sums of Money are exact. Tax is a percentage of the summed cents,     │
//! │  rounded with the same rule.                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! The invoicing API sends and expects JSON numbers in major units
//! (`27.5` is $27.50). Only the serde impls below see that form.
//!
//! ```rust
//! use rust_decimal::Decimal;
//! use tally_core::money::Money;
//!
//! let sub_total = Money::from_cents(2700);
//! assert_eq!(sub_total.percentage(Decimal::TEN), Money::from_cents(270));
//! assert_eq!(sub_total + Money::from_cents(270), Money::from_cents(2970));
//! ```

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An amount in cents. Negative values are allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Rounds a major-unit decimal to the cent, half away from zero.
    /// Out-of-range values saturate at the i64 bounds.
    ///
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use tally_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(Decimal::new(2705, 3)).cents(), 271);
    /// ```
    pub fn from_decimal(amount: Decimal) -> Self {
        let cents = amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|c| c.to_i64());

        match cents {
            Some(c) => Money(c),
            None if amount.is_sign_negative() => Money(i64::MIN),
            None => Money(i64::MAX),
        }
    }

    /// Major units, exact (`1099` → `10.99`).
    #[inline]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Whole major units, truncated toward zero.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// The 0-99 remainder after `dollars()`.
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// `percentage`% of this amount, rounded to the cent. Overflow yields
    /// zero.
    pub fn percentage(&self, percentage: Decimal) -> Money {
        self.to_decimal()
            .checked_mul(percentage)
            .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
            .map_or(Money::zero(), Money::from_decimal)
    }
}

/// `$10.99` / `-$5.50`. Used in log fields; display code goes through
/// `ClientConfig::format_currency` for the configured symbol.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.dollars().unsigned_abs(), self.cents_part())
    }
}

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

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.to_decimal(), serializer)
    }
}

/// Accepts JSON integers and floats in major units.
impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        rust_decimal::serde::float::deserialize(deserializer).map(Money::from_decimal)
    }
}
