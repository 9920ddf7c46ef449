//! # Money Module
//!
//! Provides the `Money` type used for every price, charge, expense and
//! cash amount in the ledgers.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Summing order profits in floating point:                               │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Dashboard totals are sums over thousands of orders and expenses,      │
//! │  so rounding drift would show up as phantom profit or loss.            │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units (paisa / cents)                      │
//! │    ৳150.00 = 15000, ৳10.50 = 1050                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use opsdesk_core::money::Money;
//!
//! let sale = Money::from_major(150);
//! let delivery = Money::from_major(60);
//! assert_eq!((sale + delivery).cents(), 21000);
//!
//! // Form input is cleaned the way the order screens always did it
//! assert_eq!(Money::parse_lenient("৳ 1,200.50").cents(), 120050);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: net profit and company value can be negative
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Saturating arithmetic**: a stored outlier clamps a dashboard total
///   at `i64::MIN`/`i64::MAX` instead of panicking on every read
///
/// ## Where Money Flows
/// ```text
/// Product.buy_price ──► Order.purchase_price (snapshot) ──┐
/// Product.sell_price ─► Order.sale_price ─────────────────┼─► Order.net_profit
///                       Order.delivery_charge ──┐         │
///                                               ▼         ▼
///                                    Order.total_amount   Dashboard.net_profit
///                                    (COD collected)      (− Σ Expense.amount)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use opsdesk_core::money::Money;
    ///
    /// let fee = Money::from_cents(1050); // 10.50
    /// assert_eq!(fee.cents(), 1050);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole major units.
    ///
    /// ## Example
    /// ```rust
    /// use opsdesk_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(60).cents(), 6000);
    /// assert_eq!(Money::from_major(-5).cents(), -500);
    /// ```
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major.saturating_mul(100))
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole major-unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor-unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Clamps negative values to zero.
    #[inline]
    pub const fn non_negative(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            *self
        }
    }

    /// Multiplies by a unit count (stock valuation).
    ///
    /// Stock may be negative after oversold races, so the product may be
    /// negative too.
    ///
    /// ## Example
    /// ```rust
    /// use opsdesk_core::money::Money;
    ///
    /// let buy = Money::from_major(100);
    /// assert_eq!(buy.times(4).cents(), 40000);
    /// assert_eq!(buy.times(-1).cents(), -10000);
    /// ```
    #[inline]
    pub const fn times(&self, units: i64) -> Self {
        Money(self.0.saturating_mul(units))
    }

    /// Parses free-form amount input.
    ///
    /// Every character other than digits, `.` and `-` is discarded first,
    /// so currency signs, thousands separators and stray spaces are
    /// accepted. Anything that still does not parse yields zero. Digits past
    /// the second decimal place are truncated.
    ///
    /// ## Example
    /// ```rust
    /// use opsdesk_core::money::Money;
    ///
    /// assert_eq!(Money::parse_lenient("1,200").cents(), 120000);
    /// assert_eq!(Money::parse_lenient("৳ 99.5").cents(), 9950);
    /// assert_eq!(Money::parse_lenient("-10.25").cents(), -1025);
    /// assert_eq!(Money::parse_lenient("n/a").cents(), 0);
    /// ```
    pub fn parse_lenient(input: &str) -> Money {
        let cleaned: String = input
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
            .collect();

        let (negative, body) = match cleaned.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, cleaned.as_str()),
        };

        let mut parts = body.splitn(2, '.');
        let whole = parts.next().unwrap_or_default();
        let fraction = parts.next().unwrap_or_default();

        // Another '-' or '.' inside the number means garbage input.
        if whole.contains('-') || fraction.contains('-') || fraction.contains('.') {
            return Money::zero();
        }
        if whole.is_empty() && fraction.is_empty() {
            return Money::zero();
        }

        let whole_value: i64 = if whole.is_empty() {
            0
        } else {
            match whole.parse::<i64>() {
                Ok(v) => v,
                Err(_) => return Money::zero(),
            }
        };

        let mut minor_digits: String = fraction.chars().take(2).collect();
        while minor_digits.len() < 2 {
            minor_digits.push('0');
        }
        let minor_value: i64 = minor_digits.parse().unwrap_or(0);

        let cents = whole_value
            .saturating_mul(100)
            .saturating_add(minor_value);
        Money(if negative { -cents } else { cents })
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain `major.minor` rendering; the front-end adds the currency sign.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
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

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(self.0.saturating_neg())
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, units: i64) -> Self {
        self.times(units)
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

    #[test]
    fn test_from_major_and_parts() {
        let money = Money::from_major(150);
        assert_eq!(money.cents(), 15000);
        assert_eq!(money.major(), 150);
        assert_eq!(money.minor(), 0);

        let odd = Money::from_cents(-1050);
        assert_eq!(odd.major(), -10);
        assert_eq!(odd.minor(), 50);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(21000).to_string(), "210.00");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let sale = Money::from_major(150);
        let cost = Money::from_major(100);
        let packaging = Money::from_major(10);

        assert_eq!((sale - cost - packaging).cents(), 4000);
        assert_eq!((sale + Money::from_major(60)).cents(), 21000);
        assert_eq!((-sale).cents(), -15000);
        assert_eq!((cost * 3).cents(), 30000);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let huge = Money::from_cents(i64::MAX / 2);
        assert_eq!(huge.times(3).cents(), i64::MAX);
        assert_eq!(huge.times(-3).cents(), i64::MIN);
        assert_eq!((huge + huge + huge).cents(), i64::MAX);
        assert_eq!((-huge - huge - huge).cents(), i64::MIN);
        assert_eq!((-Money::from_cents(i64::MIN)).cents(), i64::MAX);
        assert_eq!(Money::from_major(i64::MAX).cents(), i64::MAX);

        let mut total = Money::from_cents(i64::MAX);
        total += Money::from_major(1);
        assert_eq!(total.cents(), i64::MAX);
        total -= Money::from_cents(i64::MAX);
        assert!(total.is_zero());
    }

    #[test]
    fn test_sum() {
        let amounts = vec![
            Money::from_major(10),
            Money::from_major(20),
            Money::from_cents(-500),
        ];
        let total: Money = amounts.iter().sum();
        assert_eq!(total.cents(), 2500);

        let owned: Money = amounts.into_iter().sum();
        assert_eq!(owned.cents(), 2500);
    }

    #[test]
    fn test_non_negative() {
        assert_eq!(Money::from_cents(-1).non_negative(), Money::zero());
        assert_eq!(Money::from_cents(7).non_negative().cents(), 7);
    }

    #[test]
    fn test_parse_lenient_accepts_decorated_input() {
        assert_eq!(Money::parse_lenient("150").cents(), 15000);
        assert_eq!(Money::parse_lenient("৳150").cents(), 15000);
        assert_eq!(Money::parse_lenient("1,250.75").cents(), 125075);
        assert_eq!(Money::parse_lenient(" 60 tk ").cents(), 6000);
        assert_eq!(Money::parse_lenient(".5").cents(), 50);
        assert_eq!(Money::parse_lenient("12.349").cents(), 1234);
    }

    #[test]
    fn test_parse_lenient_garbage_is_zero() {
        assert!(Money::parse_lenient("").is_zero());
        assert!(Money::parse_lenient("abc").is_zero());
        assert!(Money::parse_lenient("1.2.3").is_zero());
        assert!(Money::parse_lenient("5-3").is_zero());
        assert!(Money::parse_lenient("-").is_zero());
    }
}
