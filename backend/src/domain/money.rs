//! Monetary amounts held in kobo, the gateway's minor currency unit.
//!
//! Earlier revisions of the site drifted between kobo and naira depending on
//! which handler touched the value. Every amount inside the domain is an
//! [`Amount`] of whole kobo; naira only appears at the edges, parsed with
//! exact decimal arithmetic and rendered for display.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Kobo per naira.
pub const KOBO_PER_NAIRA: i64 = 100;

/// Validation errors raised when constructing an [`Amount`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    /// The amount was below zero.
    #[error("amount must not be negative")]
    Negative,
    /// The naira string had more than two decimal places.
    #[error("amount must not carry more than two decimal places")]
    TooManyDecimals,
    /// The input was not a decimal number.
    #[error("amount is not a valid decimal number")]
    NotANumber,
    /// The amount overflowed the kobo range.
    #[error("amount is too large")]
    Overflow,
}

/// A non-negative amount of money in whole kobo.
///
/// ## Invariants
/// - The wrapped value is `>= 0`.
///
/// Serialises as a bare integer so wire payloads match the gateway's
/// `amount` field.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(try_from = "i64", into = "i64")]
#[schema(value_type = i64, example = 5000)]
pub struct Amount(i64);

impl Amount {
    /// Zero kobo.
    pub const ZERO: Self = Self(0);

    /// Validate and wrap a kobo value.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::Negative`] for values below zero.
    pub const fn from_kobo(kobo: i64) -> Result<Self, AmountError> {
        if kobo < 0 {
            return Err(AmountError::Negative);
        }
        Ok(Self(kobo))
    }

    /// Parse a naira decimal string (`"50"`, `"50.2"`, `"50.25"`) into kobo.
    ///
    /// Parsing is exact: the string is split on the decimal point and scaled
    /// with integer arithmetic, so `"0.1"` becomes exactly 10 kobo.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::NotANumber`] for empty or non-numeric input,
    /// [`AmountError::TooManyDecimals`] beyond two decimal places,
    /// [`AmountError::Negative`] for signed-negative input, and
    /// [`AmountError::Overflow`] when the value exceeds the kobo range.
    pub fn from_naira_str(input: &str) -> Result<Self, AmountError> {
        let trimmed = input.trim();
        if trimmed.starts_with('-') {
            return Err(AmountError::Negative);
        }
        let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
        if unsigned.is_empty() {
            return Err(AmountError::NotANumber);
        }

        let (whole, fraction) = match unsigned.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (unsigned, ""),
        };
        if whole.is_empty() && fraction.is_empty() {
            return Err(AmountError::NotANumber);
        }
        if fraction.chars().count() > 2 {
            return Err(AmountError::TooManyDecimals);
        }

        let naira = parse_digits(whole)?;
        let kobo_fraction = parse_fraction(fraction)?;

        let kobo = naira
            .checked_mul(KOBO_PER_NAIRA)
            .and_then(|scaled| scaled.checked_add(kobo_fraction))
            .ok_or(AmountError::Overflow)?;
        Self::from_kobo(kobo)
    }

    /// The wrapped kobo value.
    #[must_use]
    pub const fn kobo(self) -> i64 {
        self.0
    }

    /// Whether the amount is exactly zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Add two amounts, failing on overflow.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::Overflow`] when the sum exceeds the kobo range.
    pub const fn checked_add(self, other: Self) -> Result<Self, AmountError> {
        match self.0.checked_add(other.0) {
            Some(total) => Ok(Self(total)),
            None => Err(AmountError::Overflow),
        }
    }

    /// Render the amount as a naira string with two decimal places.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::Amount;
    ///
    /// let amount = Amount::from_kobo(5025).expect("non-negative");
    /// assert_eq!(amount.to_naira_string(), "50.25");
    /// ```
    #[must_use]
    pub fn to_naira_string(self) -> String {
        let naira = self.0.div_euclid(KOBO_PER_NAIRA);
        let kobo = self.0.rem_euclid(KOBO_PER_NAIRA);
        format!("{naira}.{kobo:02}")
    }
}

fn parse_digits(digits: &str) -> Result<i64, AmountError> {
    if digits.is_empty() {
        return Ok(0);
    }
    if !digits.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(AmountError::NotANumber);
    }
    digits.parse::<i64>().map_err(|_| AmountError::Overflow)
}

fn parse_fraction(fraction: &str) -> Result<i64, AmountError> {
    let scaled = parse_digits(fraction)?;
    // One decimal digit means tenths of a naira, so ten kobo each.
    if fraction.chars().count() == 1 {
        return Ok(scaled.saturating_mul(10));
    }
    Ok(scaled)
}

impl TryFrom<i64> for Amount {
    type Error = AmountError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_kobo(value)
    }
}

impl From<Amount> for i64 {
    fn from(value: Amount) -> Self {
        value.kobo()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\u{20a6}{}", self.to_naira_string())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for amount normalisation.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("50", 5000)]
    #[case("50.2", 5020)]
    #[case("50.25", 5025)]
    #[case(" 1000 ", 100_000)]
    #[case("0.01", 1)]
    #[case(".5", 50)]
    #[case("7.", 700)]
    fn naira_strings_parse_exactly(#[case] input: &str, #[case] expected_kobo: i64) {
        let amount = Amount::from_naira_str(input).expect("valid amount");
        assert_eq!(amount.kobo(), expected_kobo);
    }

    #[rstest]
    #[case("", AmountError::NotANumber)]
    #[case("abc", AmountError::NotANumber)]
    #[case(".", AmountError::NotANumber)]
    #[case("12.345", AmountError::TooManyDecimals)]
    #[case("-5", AmountError::Negative)]
    #[case("99999999999999999999", AmountError::Overflow)]
    fn invalid_naira_strings_are_rejected(#[case] input: &str, #[case] expected: AmountError) {
        let err = Amount::from_naira_str(input).expect_err("invalid input must fail");
        assert_eq!(err, expected);
    }

    #[test]
    fn negative_kobo_is_rejected() {
        assert_eq!(Amount::from_kobo(-1), Err(AmountError::Negative));
    }

    #[test]
    fn serde_rejects_negative_wire_values() {
        let result: Result<Amount, _> = serde_json::from_str("-20");
        assert!(result.is_err(), "negative wire amounts must not deserialise");
    }

    #[test]
    fn serde_round_trips_as_bare_integer() {
        let amount = Amount::from_kobo(5000).expect("non-negative");
        assert_eq!(serde_json::to_string(&amount).expect("serialises"), "5000");
        let back: Amount = serde_json::from_str("5000").expect("deserialises");
        assert_eq!(back, amount);
    }

    #[test]
    fn rendering_pads_kobo_to_two_places() {
        let amount = Amount::from_kobo(5003).expect("non-negative");
        assert_eq!(amount.to_naira_string(), "50.03");
        assert_eq!(amount.to_string(), "\u{20a6}50.03");
    }

    #[test]
    fn checked_add_accumulates() {
        let a = Amount::from_kobo(5000).expect("non-negative");
        let b = Amount::from_kobo(2500).expect("non-negative");
        assert_eq!(a.checked_add(b).expect("fits").kobo(), 7500);
        assert_eq!(
            Amount::from_kobo(i64::MAX).expect("non-negative").checked_add(b),
            Err(AmountError::Overflow)
        );
    }
}
