//! Type-safe price representation using decimal arithmetic.
//!
//! The demo catalog sends prices as JSON numbers (`109.95`). They are decoded
//! straight into a [`Decimal`] so cart and dashboard totals never accumulate
//! float error. All prices are in a single currency (USD).

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};
use core::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A price in dollars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// Zero dollars.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price multiplied by a quantity.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Lossy conversion for display-only math (chart widths, ratios).
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }

    /// Largest whole dollar amount not above this price.
    #[must_use]
    pub fn floor(&self) -> Self {
        Self(self.0.floor())
    }

    /// Smallest whole dollar amount not below this price.
    #[must_use]
    pub fn ceil(&self) -> Self {
        Self(self.0.ceil())
    }

    /// Whether the amount is strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0.round_dp(2))
    }
}

impl FromStr for Price {
    type Err = rust_decimal::Error;

    /// Parses a plain amount such as `19.99`; a leading `$` is accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('$').unwrap_or(s);
        Decimal::from_str(s).map(Self)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<i64> for Price {
    fn from(dollars: i64) -> Self {
        Self(Decimal::from(dollars))
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self::Output {
        self.times(rhs)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        rust_decimal::serde::float::deserialize(deserializer).map(Self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Price::from_cents(10995).to_string(), "$109.95");
        assert_eq!(Price::from(5).to_string(), "$5.00");
        assert_eq!("22.3".parse::<Price>().unwrap().to_string(), "$22.30");
    }

    #[test]
    fn test_decodes_json_numbers() {
        let price: Price = serde_json::from_str("109.95").unwrap();
        assert_eq!(price, Price::from_cents(10995));

        let whole: Price = serde_json::from_str("64").unwrap();
        assert_eq!(whole, Price::from(64));
    }

    #[test]
    fn test_encodes_as_json_number() {
        let json = serde_json::to_string(&Price::from_cents(2230)).unwrap();
        assert_eq!(json, "22.3");
    }

    #[test]
    fn test_sum_has_no_float_drift() {
        let total: Price = [Price::from_cents(10), Price::from_cents(20)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_cents(30));
        assert_eq!(Price::from_cents(2230) * 2, Price::from_cents(4460));
    }

    #[test]
    fn test_parse_accepts_dollar_sign() {
        assert_eq!("$7.50".parse::<Price>().unwrap(), Price::from_cents(750));
        assert!("seven".parse::<Price>().is_err());
    }

    #[test]
    fn test_floor_and_ceil() {
        let price = Price::from_cents(10995);
        assert_eq!(price.floor(), Price::from(109));
        assert_eq!(price.ceil(), Price::from(110));
    }
}
