//! Amount type for monetary values.
//!
//! This module provides the `Amount` type which wraps `Decimal`. Parsing accepts values that may
//! include a currency symbol and thousands separators, since user-entered and imported data often
//! carry them. The stored value is currency-agnostic.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Represents a monetary quantity.
///
/// This type wraps `Decimal` and provides custom serialization/deserialization so that values
/// formatted with a leading `$` or with commas parse cleanly.
///
/// # Examples
///
/// ```
/// # use moneta::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("$1,250.00").unwrap();
/// assert_eq!(amount.to_string(), "1,250.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// Creates a new `Amount` from a `Decimal` value.
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying `Decimal` value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.0.is_sign_positive()
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative()
    }
}

impl FromStr for Amount {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Amount::default());
        }

        // Strip a currency symbol, which may appear before or after the minus sign.
        let bare = if let Some(after_minus) = trimmed.strip_prefix('-') {
            let digits = after_minus.strip_prefix('$').unwrap_or(after_minus);
            format!("-{digits}")
        } else {
            trimmed.strip_prefix('$').unwrap_or(trimmed).to_string()
        };

        let without_commas = bare.replace(',', "");
        Ok(Amount(Decimal::from_str(&without_commas)?))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (sign, num) = if self.is_negative() {
            ("-", self.0.abs())
        } else {
            ("", self.0)
        };
        write!(
            f,
            "{sign}{}",
            format_num::format_num!(",.2", num.to_f64().unwrap_or_default())
        )
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Serialize the plain decimal value, not the display form with separators.
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_plain() {
        let amount = Amount::from_str("50.00").unwrap();
        assert_eq!(amount.value(), dec!(50.00));
    }

    #[test]
    fn test_parse_with_currency_symbol() {
        let amount = Amount::from_str("$50.00").unwrap();
        assert_eq!(amount.value(), dec!(50.00));
    }

    #[test]
    fn test_parse_negative_with_currency_symbol() {
        let amount = Amount::from_str("-$50.00").unwrap();
        assert_eq!(amount.value(), dec!(-50.00));
    }

    #[test]
    fn test_parse_with_commas() {
        let amount = Amount::from_str("1,234,567.89").unwrap();
        assert_eq!(amount.value(), dec!(1234567.89));
    }

    #[test]
    fn test_parse_empty_string() {
        let amount = Amount::from_str("").unwrap();
        assert!(amount.is_zero());
    }

    #[test]
    fn test_parse_whitespace() {
        let amount = Amount::from_str("  $50.00  ").unwrap();
        assert_eq!(amount.value(), dec!(50.00));
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert!(Amount::from_str("fifty").is_err());
    }

    #[test]
    fn test_display() {
        let amount = Amount::new(dec!(1250));
        assert_eq!(amount.to_string(), "1,250.00");
    }

    #[test]
    fn test_display_negative() {
        let amount = Amount::new(dec!(-50));
        assert_eq!(amount.to_string(), "-50.00");
    }

    #[test]
    fn test_serialize_plain_value() {
        let amount = Amount::new(dec!(1250.50));
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"1250.50\"");
    }

    #[test]
    fn test_deserialize() {
        let amount: Amount = serde_json::from_str("\"$1,250.50\"").unwrap();
        assert_eq!(amount.value(), dec!(1250.50));
    }

    #[test]
    fn test_zero_is_not_positive_or_negative() {
        let zero = Amount::from_str("0.00").unwrap();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());
    }

    #[test]
    fn test_is_positive() {
        assert!(Amount::new(dec!(50)).is_positive());
        assert!(!Amount::new(dec!(-50)).is_positive());
    }
}
