use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::EngineError;

/// Signed money amount represented as **integer cents**.
///
/// Every amount in the engine (expense amounts, budgets, summary totals) uses
/// this type, so sums never drift and are only rounded when displayed.
///
/// Negative amounts are refunds or corrections.
///
/// # Examples
///
/// ```rust
/// use engine::Amount;
///
/// let amount = Amount::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects >
/// 2 decimals):
///
/// ```rust
/// use engine::Amount;
///
/// assert_eq!("10".parse::<Amount>().unwrap().cents(), 1000);
/// assert_eq!("-10,5".parse::<Amount>().unwrap().cents(), -1050);
/// assert_eq!(".5".parse::<Amount>().unwrap().cents(), 50);
/// assert!("12.345".parse::<Amount>().is_err());
/// assert!("NaN".parse::<Amount>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Creates a new amount from whole units (`50` -> `50.00`).
    #[must_use]
    pub const fn units(units: i64) -> Self {
        Self(units * 100)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    #[must_use]
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    #[must_use]
    pub fn checked_mul(self, rhs: u32) -> Option<Amount> {
        self.0.checked_mul(i64::from(rhs)).map(Amount)
    }

    /// Lossy conversion used only at JSON boundaries.
    #[must_use]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Amount> for i64 {
    fn from(value: Amount) -> Self {
        value.0
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        self.0 += rhs.0;
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Amount) -> Self::Output {
        Amount(self.0 - rhs.0)
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Amount) {
        self.0 -= rhs.0;
    }
}

impl Mul<u32> for Amount {
    type Output = Amount;

    fn mul(self, rhs: u32) -> Self::Output {
        Amount(self.0 * i64::from(rhs))
    }
}

impl Neg for Amount {
    type Output = Amount;

    fn neg(self) -> Self::Output {
        Amount(-self.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl FromStr for Amount {
    type Err = EngineError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    /// Anything that is not a plain finite decimal (`NaN`, `inf`, `1e3`, ...)
    /// is rejected, as are more than 2 fractional digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let empty = || EngineError::InvalidAmount("empty amount".to_string());
        let invalid = || EngineError::InvalidAmount(format!("\"{}\" is not a number", s.trim()));
        let overflow = || EngineError::InvalidAmount("amount too large".to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }

        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        let rest = rest.replace(',', ".");
        let (units_str, frac_str) = match rest.split_once('.') {
            Some((units, frac)) => (units, Some(frac)),
            None => (rest.as_str(), None),
        };

        let all_digits = |v: &str| v.chars().all(|c| c.is_ascii_digit());
        if !all_digits(units_str) {
            return Err(invalid());
        }
        // `.5` is fine, a lone `.` is not.
        if units_str.is_empty() && frac_str.is_none_or(str::is_empty) {
            return Err(invalid());
        }

        let units: i64 = if units_str.is_empty() {
            0
        } else {
            units_str.parse().map_err(|_| overflow())?
        };
        let cents: i64 = match frac_str {
            None | Some("") => 0,
            Some(frac) if !all_digits(frac) => return Err(invalid()),
            Some(frac) if frac.len() == 1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
            Some(frac) if frac.len() == 2 => frac.parse::<i64>().map_err(|_| invalid())?,
            Some(_) => {
                return Err(EngineError::InvalidAmount(
                    "at most 2 decimal places are allowed".to_string(),
                ));
            }
        };

        let total = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .ok_or_else(overflow)?;

        Ok(Amount(if negative { -total } else { total }))
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

/// Configuration files may spell budgets as numbers (`50`, `12.5`) or as
/// decimal strings (`"12.50"`); both go through the same parser.
impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Float(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Int(units) => units
                .checked_mul(100)
                .map(Amount)
                .ok_or_else(|| de::Error::custom("amount too large")),
            Raw::Float(value) if value.is_finite() => format!("{value:.2}")
                .parse()
                .map_err(de::Error::custom),
            Raw::Float(value) => Err(de::Error::custom(format!("invalid amount: {value}"))),
            Raw::Text(text) => text.parse().map_err(de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_two_decimals() {
        assert_eq!(Amount::new(0).to_string(), "0.00");
        assert_eq!(Amount::new(1).to_string(), "0.01");
        assert_eq!(Amount::new(1050).to_string(), "10.50");
        assert_eq!(Amount::new(-1050).to_string(), "-10.50");
        assert_eq!(Amount::units(1850).to_string(), "1850.00");
    }

    #[test]
    fn parse_accepts_signed_decimals() {
        assert_eq!("12.50".parse::<Amount>().unwrap().cents(), 1250);
        assert_eq!("12".parse::<Amount>().unwrap().cents(), 1200);
        assert_eq!("10,5".parse::<Amount>().unwrap().cents(), 1050);
        assert_eq!("-0.01".parse::<Amount>().unwrap().cents(), -1);
        assert_eq!("+1.00".parse::<Amount>().unwrap().cents(), 100);
        assert_eq!("  2.30 ".parse::<Amount>().unwrap().cents(), 230);
        assert_eq!("7.".parse::<Amount>().unwrap().cents(), 700);
        assert_eq!(".5".parse::<Amount>().unwrap().cents(), 50);
        assert_eq!("-,25".parse::<Amount>().unwrap().cents(), -25);
    }

    #[test]
    fn parse_rejects_non_finite_and_garbage() {
        for raw in ["", "abc", "NaN", "inf", "-Infinity", "1e3", "1.2.3", ".", "-.", "-", "12 50"] {
            assert!(raw.parse::<Amount>().is_err(), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn parse_rejects_more_than_two_decimals() {
        assert!("12.345".parse::<Amount>().is_err());
    }

    #[test]
    fn sum_and_multiply_are_exact() {
        let total: Amount = [Amount::new(10), Amount::new(20), Amount::new(-5)]
            .iter()
            .sum();
        assert_eq!(total, Amount::new(25));
        assert_eq!(Amount::new(333) * 3, Amount::new(999));
        assert_eq!(Amount::new(i64::MAX).checked_mul(2), None);
        assert_eq!(Amount::new(i64::MAX).checked_add(Amount::new(1)), None);
    }

    #[test]
    fn deserializes_numbers_and_strings() {
        #[derive(Deserialize)]
        struct Wrap {
            a: Amount,
        }

        let parse = |raw: &str| serde_json::from_str::<Wrap>(raw).map(|w| w.a.cents());
        assert_eq!(parse(r#"{"a": 50}"#).unwrap(), 5000);
        assert_eq!(parse(r#"{"a": 12.5}"#).unwrap(), 1250);
        assert_eq!(parse(r#"{"a": "0.99"}"#).unwrap(), 99);
        assert!(parse(r#"{"a": "oops"}"#).is_err());
    }
}
