//! Decimal money amounts.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Sub};
use core::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::LedgerError;

/// Number of fractional digits amounts are displayed and rounded to.
pub const SCALE: i64 = 2;

/// Largest decimal exponent accepted by [`Amount::parse_lenient`].
///
/// Matches the range of a double, beyond which a permissive number field
/// no longer produces a finite value.
const MAX_EXPONENT: u64 = 308;

/// A money value backed by [`BigDecimal`].
///
/// Amounts typed by the user keep every digit they were entered with, so
/// `0.125` stays `0.125`. Results of arithmetic ([`Amount::from_decimal`],
/// `+`, `-`, sums) are rounded half-up (ties away from zero) to [`SCALE`]
/// places. Display always shows exactly two places.
///
/// Serialized as a string holding the full value (`"14.00"`, `"0.125"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount(BigDecimal);

impl Amount {
    /// Returns `0.00`.
    #[inline]
    #[must_use]
    pub fn zero() -> Self {
        Self(BigDecimal::from(0_i32).with_scale(SCALE))
    }

    /// Rounds an arbitrary decimal to two places.
    #[inline]
    #[must_use]
    pub fn from_decimal(value: &BigDecimal) -> Self {
        Self(value.with_scale_round(SCALE, RoundingMode::HalfUp))
    }

    /// Keeps every digit of `value`, padding it to at least two places.
    #[inline]
    #[must_use]
    pub fn exact(value: BigDecimal) -> Self {
        let (_, scale) = value.as_bigint_and_exponent();
        if scale < SCALE {
            Self(value.with_scale(SCALE))
        } else {
            Self(value)
        }
    }

    /// Returns the underlying decimal at full precision.
    #[inline]
    #[must_use]
    pub const fn as_decimal(&self) -> &BigDecimal {
        &self.0
    }

    /// Returns the value rounded half-up to two places.
    #[inline]
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self::from_decimal(&self.0)
    }

    /// Returns `true` if the amount is below zero.
    #[inline]
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0 < BigDecimal::from(0_i32)
    }

    /// Parses user-typed text the way a permissive form field does.
    ///
    /// Leading whitespace is skipped and the longest numeric prefix is
    /// taken, so `"12abc"` reads as `12`, `"3.5 kg"` as `3.5` and `"1e3"`
    /// as `1000`. The value keeps its entered precision. Returns `None`
    /// when no digits lead the input or the exponent exceeds ±308.
    #[must_use]
    pub fn parse_lenient(input: &str) -> Option<Self> {
        let prefix = decimal_prefix(input)?;
        BigDecimal::from_str(&prefix).ok().map(Self::exact)
    }
}

impl Default for Amount {
    #[inline]
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Amount {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.rounded().0)
    }
}

impl FromStr for Amount {
    type Err = LedgerError;

    /// Parses a complete decimal, keeping its precision.
    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BigDecimal::from_str(s.trim())
            .map(Self::exact)
            .map_err(|_err| LedgerError::InvalidAmount(s.to_owned()))
    }
}

impl Add for Amount {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::from_decimal(&(self.0 + rhs.0))
    }
}

impl Sub for Amount {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::from_decimal(&(self.0 - rhs.0))
    }
}

impl<'a> Sum<&'a Self> for Amount {
    #[inline]
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        let total = iter.fold(BigDecimal::from(0_i32), |acc, amount| acc + &amount.0);
        Self::from_decimal(&total)
    }
}

impl Sum for Amount {
    #[inline]
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        let total = iter.fold(BigDecimal::from(0_i32), |acc, amount| acc + amount.0);
        Self::from_decimal(&total)
    }
}

impl Serialize for Amount {
    #[inline]
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let (_, scale) = self.0.as_bigint_and_exponent();
        let places = usize::try_from(scale.max(SCALE)).unwrap_or(2);
        serializer.collect_str(&format_args!("{:.*}", places, self.0))
    }
}

impl<'de> Deserialize<'de> for Amount {
    #[inline]
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Extracts `[+-]digits[.digits][e[+-]digits]` from the start of `input`.
///
/// A missing integer part is written as `0` so `".5"` becomes `"0.5"`. An
/// `e` not followed by digits ends the number (`"2e"` is `2`).
fn decimal_prefix(input: &str) -> Option<String> {
    let mut chars = input.trim_start().chars().peekable();
    let mut prefix = String::new();
    if let Some(sign) = chars.next_if(|c| matches!(*c, '+' | '-')) {
        prefix.push(sign);
    }

    let mut integer = String::new();
    while let Some(digit) = chars.next_if(char::is_ascii_digit) {
        integer.push(digit);
    }

    let mut fraction = String::new();
    if chars.next_if_eq(&'.').is_some() {
        while let Some(digit) = chars.next_if(char::is_ascii_digit) {
            fraction.push(digit);
        }
    }

    if integer.is_empty() && fraction.is_empty() {
        return None;
    }
    if integer.is_empty() {
        integer.push('0');
    }
    prefix.push_str(&integer);
    if !fraction.is_empty() {
        prefix.push('.');
        prefix.push_str(&fraction);
    }

    if chars.next_if(|c| matches!(*c, 'e' | 'E')).is_some() {
        let mut exponent = String::new();
        if let Some(sign) = chars.next_if(|c| matches!(*c, '+' | '-')) {
            exponent.push(sign);
        }
        let sign_len = exponent.len();
        while let Some(digit) = chars.next_if(char::is_ascii_digit) {
            exponent.push(digit);
        }
        if exponent.len() > sign_len {
            let power = exponent.parse::<i64>().ok()?;
            if power.unsigned_abs() > MAX_EXPONENT {
                return None;
            }
            prefix.push('e');
            prefix.push_str(&exponent);
        }
    }
    Some(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(s: &str) -> Amount {
        s.parse().unwrap()
    }

    #[test]
    fn zero_displays_two_places() {
        assert_eq!(Amount::zero().to_string(), "0.00");
        assert_eq!(Amount::default(), Amount::zero());
    }

    #[test]
    fn display_rounds_half_up() {
        assert_eq!(amount("1.005").to_string(), "1.01");
        assert_eq!(amount("2.675").to_string(), "2.68");
        assert_eq!(amount("2.674").to_string(), "2.67");
        assert_eq!(amount("-1.005").to_string(), "-1.01");
        assert_eq!(amount("  7 ").to_string(), "7.00");
    }

    #[test]
    fn from_str_rejects_garbage() {
        let err = "abc".parse::<Amount>().unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(_)));
        assert!("".parse::<Amount>().is_err());
    }

    #[test]
    fn lenient_takes_numeric_prefix() {
        assert_eq!(Amount::parse_lenient("12abc"), Some(amount("12")));
        assert_eq!(Amount::parse_lenient("  3.5 kg"), Some(amount("3.5")));
        assert_eq!(Amount::parse_lenient(".5"), Some(amount("0.5")));
        assert_eq!(Amount::parse_lenient("-4"), Some(amount("-4")));
        assert_eq!(Amount::parse_lenient("12."), Some(amount("12")));
        assert_eq!(Amount::parse_lenient("12.345"), Some(amount("12.345")));
    }

    #[test]
    fn lenient_rejects_non_numeric() {
        assert_eq!(Amount::parse_lenient(""), None);
        assert_eq!(Amount::parse_lenient("   "), None);
        assert_eq!(Amount::parse_lenient("abc"), None);
        assert_eq!(Amount::parse_lenient("-"), None);
        assert_eq!(Amount::parse_lenient("."), None);
    }

    #[test]
    fn arithmetic_keeps_two_places() {
        assert_eq!(amount("0.10") + amount("0.20"), amount("0.30"));
        assert_eq!(amount("5") - amount("7.25"), amount("-2.25"));
        assert!((amount("5") - amount("7.25")).is_negative());
        assert!(!Amount::zero().is_negative());
    }

    #[test]
    fn sum_of_references_and_values() {
        let items = [amount("14.00"), amount("10.00"), amount("0.01")];
        let by_ref: Amount = items.iter().sum();
        assert_eq!(by_ref.to_string(), "24.01");
        let by_value: Amount = items.into_iter().sum();
        assert_eq!(by_value, by_ref);
        let empty: Amount = core::iter::empty::<Amount>().sum();
        assert_eq!(empty.to_string(), "0.00");
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&amount("14")).unwrap();
        assert_eq!(json, r#""14.00""#);
        let parsed: Amount = serde_json::from_str(r#""10.5""#).unwrap();
        assert_eq!(parsed, amount("10.50"));
    }

    #[test]
    fn entered_precision_is_kept() {
        let price = amount("0.125");
        assert_eq!(price.as_decimal(), &BigDecimal::from_str("0.125").unwrap());
        assert_eq!(price.to_string(), "0.13");
        assert_eq!(price.rounded(), amount("0.13"));

        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, r#""0.125""#);
        let restored: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, price);
    }

    #[test]
    fn lenient_reads_exponents() {
        assert_eq!(Amount::parse_lenient("1e3"), Some(amount("1000")));
        assert_eq!(Amount::parse_lenient("2.5E-1 each"), Some(amount("0.25")));
        assert_eq!(Amount::parse_lenient("+4e+2"), Some(amount("400")));
        assert_eq!(Amount::parse_lenient("2e"), Some(amount("2")));
        assert_eq!(Amount::parse_lenient("2e-x"), Some(amount("2")));
        assert_eq!(Amount::parse_lenient("1e309"), None);
        assert_eq!(Amount::parse_lenient("e3"), None);
    }

    #[test]
    fn deserialize_rejects_non_decimal_string() {
        assert!(serde_json::from_str::<Amount>(r#""ten""#).is_err());
    }
}
