//! Thai baht amounts using decimal arithmetic.
//!
//! Prices are whole or fractional baht. Totals and subtotals are summed in
//! [`Decimal`] so `1890 + 850` is exactly `2740`.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Error returned by strict price parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PriceError {
    #[error("price is not a number: {0}")]
    Invalid(String),

    #[error("price cannot be negative")]
    Negative,

    #[error("price cannot exceed {max}")]
    TooLarge { max: Price },
}

/// A baht amount.
///
/// Serialized as a JSON number, matching the persisted product and order
/// collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// Zero baht.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest price a product form accepts (ten million baht).
    pub const MAX: Self = Self(Decimal::from_parts(10_000_000, 0, 0, false, 0));

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from whole baht.
    #[must_use]
    pub fn baht(amount: i64) -> Self {
        Self(Decimal::from(amount))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Parse a price, rejecting malformed and negative input.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError`] if the input is not a number between zero and
    /// [`Price::MAX`].
    pub fn parse(input: &str) -> Result<Self, PriceError> {
        let cleaned = input.trim().replace(',', "");
        let amount = cleaned
            .parse::<Decimal>()
            .map_err(|_| PriceError::Invalid(input.trim().to_owned()))?;
        if amount.is_sign_negative() {
            return Err(PriceError::Negative);
        }
        if amount > Self::MAX.0 {
            return Err(PriceError::TooLarge { max: Self::MAX });
        }
        Ok(Self(amount))
    }

    /// Parse a price from a form field.
    ///
    /// Invalid, negative or oversized input coerces to zero rather than
    /// failing; the product form has no other validation.
    #[must_use]
    pub fn parse_lenient(input: &str) -> Self {
        Self::parse(input).unwrap_or(Self::ZERO)
    }

    /// Divide evenly, returning zero for a zero divisor.
    #[must_use]
    pub fn average_over(self, count: usize) -> Self {
        if count == 0 {
            return Self::ZERO;
        }
        Self(self.0 / Decimal::from(count))
    }

    /// Percentage of this amount (e.g. `10` for a 10% commission).
    #[must_use]
    pub fn percent(self, rate: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(rate)) / Decimal::ONE_HUNDRED)
    }

    /// Amount rounded to two decimal places as `f64` for chart scaling.
    #[must_use]
    pub fn to_f64(self) -> f64 {
        self.0.round_dp(2).to_f64().unwrap_or(0.0)
    }
}

impl fmt::Display for Price {
    /// Formats as `฿1,890` or `฿1,890.50` (grouped thousands, cents only when
    /// present).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.0.round_dp(2).normalize();
        let negative = rounded.is_sign_negative();
        let text = rounded.abs().to_string();
        let (whole, frac) = text.split_once('.').map_or((text.as_str(), None), |(w, r)| (w, Some(r)));

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        let sign = if negative { "-" } else { "" };
        match frac {
            Some(frac) => write!(f, "{sign}฿{grouped}.{frac:0<2}"),
            None => write!(f, "{sign}฿{grouped}"),
        }
    }
}

// Amounts can come from old session or store data, so arithmetic saturates
// at `Decimal::MAX` instead of panicking.
impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(rhs)))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_f64())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = f64::deserialize(deserializer)?;
        Decimal::try_from(raw)
            .map(|d| Self(d.round_dp(2).normalize()))
            .map_err(serde::de::Error::custom)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Price::baht(2740).to_string(), "฿2,740");
        assert_eq!(Price::baht(120).to_string(), "฿120");
        assert_eq!(Price::baht(1_234_567).to_string(), "฿1,234,567");
    }

    #[test]
    fn test_display_keeps_cents() {
        let p = Price::new(Decimal::new(18_905, 1));
        assert_eq!(p.to_string(), "฿1,890.50");
    }

    #[test]
    fn test_parse_lenient_coerces_garbage_to_zero() {
        assert_eq!(Price::parse_lenient("abc"), Price::ZERO);
        assert_eq!(Price::parse_lenient(""), Price::ZERO);
        assert_eq!(Price::parse_lenient("-5"), Price::ZERO);
        assert_eq!(Price::parse_lenient(" 1,890 "), Price::baht(1890));
    }

    #[test]
    fn test_parse_strict() {
        assert_eq!(Price::parse("850").unwrap(), Price::baht(850));
        assert_eq!(Price::parse("-1").unwrap_err(), PriceError::Negative);
        assert!(matches!(Price::parse("x"), Err(PriceError::Invalid(_))));
    }

    #[test]
    fn test_parse_rejects_amounts_above_max() {
        assert_eq!(Price::parse("10,000,000").unwrap(), Price::MAX);
        assert_eq!(
            Price::parse("10000000.01").unwrap_err(),
            PriceError::TooLarge { max: Price::MAX }
        );
        assert_eq!(
            Price::parse_lenient("79228162514264337593543950335"),
            Price::ZERO
        );
    }

    #[test]
    fn test_arithmetic_saturates_instead_of_panicking() {
        let huge = Price::new(Decimal::MAX);
        assert_eq!(huge * 2, Price::new(Decimal::MAX));
        assert_eq!(huge + Price::baht(1), Price::new(Decimal::MAX));
        assert_eq!(huge.percent(10), Price::new(Decimal::MAX / Decimal::ONE_HUNDRED));
    }

    #[test]
    fn test_largest_price_survives_serde() {
        let total = Price::MAX * 999;
        let json = serde_json::to_string(&total).unwrap();
        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(back, total);
    }

    #[test]
    fn test_sum_and_multiply() {
        let total: Price = [Price::baht(1890) * 1, Price::baht(850) * 1].into_iter().sum();
        assert_eq!(total, Price::baht(2740));
    }

    #[test]
    fn test_average_over_zero_is_zero() {
        assert_eq!(Price::baht(100).average_over(0), Price::ZERO);
        assert_eq!(Price::baht(100).average_over(4), Price::baht(25));
    }

    #[test]
    fn test_percent() {
        assert_eq!(Price::baht(1890).percent(10), Price::baht(189));
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_string(&Price::baht(450)).unwrap();
        assert_eq!(json, "450.0");
        let back: Price = serde_json::from_str("450").unwrap();
        assert_eq!(back, Price::baht(450));
    }
}
