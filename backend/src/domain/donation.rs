//! Donation ledger entities.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::money::Amount;

/// Validation errors raised by the donation constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DonationValidationError {
    /// Email was blank once trimmed.
    EmptyEmail,
    /// Email lacked a local part or domain around a single `@`.
    MalformedEmail,
    /// Gateway reference was blank once trimmed.
    EmptyReference,
    /// Gateway reference carried characters outside the token alphabet.
    MalformedReference,
    /// Gateway reference exceeded the length bound.
    ReferenceTooLong {
        /// Maximum accepted length.
        max: usize,
    },
}

impl fmt::Display for DonationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::MalformedEmail => {
                write!(f, "email must contain a local part and a domain")
            }
            Self::EmptyReference => write!(f, "payment reference must not be empty"),
            Self::MalformedReference => write!(
                f,
                "payment reference may only contain letters, digits, dots, underscores, equals, or hyphens",
            ),
            Self::ReferenceTooLong { max } => {
                write!(f, "payment reference must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for DonationValidationError {}

/// Donor email address.
///
/// ## Invariants
/// - Trimmed, non-empty, and shaped `local@domain` with both sides
///   non-empty. Full RFC validation is deliberately out of scope; the
///   gateway is the authority on deliverability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "grace@example.com")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an email address.
    ///
    /// # Errors
    ///
    /// Returns [`DonationValidationError::EmptyEmail`] for blank input and
    /// [`DonationValidationError::MalformedEmail`] when the `local@domain`
    /// shape is missing.
    pub fn new(raw: &str) -> Result<Self, DonationValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DonationValidationError::EmptyEmail);
        }
        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(DonationValidationError::MalformedEmail);
        };
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(DonationValidationError::MalformedEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// The full address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Publicly displayable form with the local part masked.
    ///
    /// Matches the site's donor feed: the first two characters (one, for
    /// very short local parts) followed by `***` and the domain.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::EmailAddress;
    ///
    /// let email = EmailAddress::new("grace@example.com").expect("valid email");
    /// assert_eq!(email.masked(), "gr***@example.com");
    /// ```
    #[must_use]
    pub fn masked(&self) -> String {
        let (local, domain) = self
            .0
            .split_once('@')
            .unwrap_or((self.0.as_str(), ""));
        let keep = if local.chars().count() > 2 { 2 } else { 1 };
        let visible: String = local.chars().take(keep).collect();
        format!("{visible}***@{domain}")
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = DonationValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Maximum accepted length for a gateway reference.
pub const REFERENCE_MAX_LEN: usize = 100;

/// Gateway transaction reference.
///
/// ## Invariants
/// - Trimmed, non-empty, at most [`REFERENCE_MAX_LEN`] characters, limited
///   to ASCII letters, digits, `.`, `_`, `=`, and `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "T685312322670516")]
pub struct DonationReference(String);

impl DonationReference {
    /// Validate and construct a gateway reference.
    ///
    /// # Errors
    ///
    /// Returns the matching [`DonationValidationError`] variant for blank,
    /// oversized, or out-of-alphabet input.
    pub fn new(raw: &str) -> Result<Self, DonationValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DonationValidationError::EmptyReference);
        }
        if trimmed.chars().count() > REFERENCE_MAX_LEN {
            return Err(DonationValidationError::ReferenceTooLong {
                max: REFERENCE_MAX_LEN,
            });
        }
        let allowed =
            |ch: char| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '=' | '-');
        if !trimmed.chars().all(allowed) {
            return Err(DonationValidationError::MalformedReference);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// The raw reference token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for DonationReference {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for DonationReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for DonationReference {
    type Error = DonationValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<DonationReference> for String {
    fn from(value: DonationReference) -> Self {
        value.0
    }
}

/// How a donation entered the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DonationSource {
    /// Recorded after an inline-checkout verification call.
    Checkout,
    /// Recorded from a signed gateway webhook.
    Webhook,
    /// Seeded demo data.
    Seed,
}

impl DonationSource {
    /// Stable textual form used in storage and exports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Checkout => "checkout",
            Self::Webhook => "webhook",
            Self::Seed => "seed",
        }
    }

    /// Parse the stable textual form.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "checkout" => Some(Self::Checkout),
            "webhook" => Some(Self::Webhook),
            "seed" => Some(Self::Seed),
            _ => None,
        }
    }
}

impl fmt::Display for DonationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded contribution.
///
/// ## Invariants
/// - `amount` is non-negative by construction of [`Amount`]; the service
///   layer additionally rejects zero before recording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    id: Uuid,
    email: EmailAddress,
    amount: Amount,
    reference: DonationReference,
    source: DonationSource,
    created_at: DateTime<Utc>,
}

impl Donation {
    /// Assemble a donation from validated components.
    #[must_use]
    pub fn new(
        id: Uuid,
        email: EmailAddress,
        amount: Amount,
        reference: DonationReference,
        source: DonationSource,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            amount,
            reference,
            source,
            created_at,
        }
    }

    /// Ledger row identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Donor email address.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Contribution amount in kobo.
    #[must_use]
    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// Gateway transaction reference.
    #[must_use]
    pub fn reference(&self) -> &DonationReference {
        &self.reference
    }

    /// How the donation entered the ledger.
    #[must_use]
    pub fn source(&self) -> DonationSource {
        self.source
    }

    /// When the donation was recorded.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for donation value objects.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("grace@example.com", "gr***@example.com")]
    #[case("jo@example.com", "j***@example.com")]
    #[case("a@example.com", "a***@example.com")]
    #[case("mary.jane@mail.test", "ma***@mail.test")]
    fn emails_mask_like_the_donor_feed(#[case] input: &str, #[case] expected: &str) {
        let email = EmailAddress::new(input).expect("valid email");
        assert_eq!(email.masked(), expected);
    }

    #[rstest]
    #[case("", DonationValidationError::EmptyEmail)]
    #[case("   ", DonationValidationError::EmptyEmail)]
    #[case("no-at-sign", DonationValidationError::MalformedEmail)]
    #[case("@example.com", DonationValidationError::MalformedEmail)]
    #[case("user@", DonationValidationError::MalformedEmail)]
    #[case("a@b@c", DonationValidationError::MalformedEmail)]
    fn invalid_emails_are_rejected(
        #[case] input: &str,
        #[case] expected: DonationValidationError,
    ) {
        let err = EmailAddress::new(input).expect_err("invalid email must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("T685312322670516")]
    #[case("ref_2024-08.01=x")]
    fn valid_references_are_accepted(#[case] input: &str) {
        let reference = DonationReference::new(input).expect("valid reference");
        assert_eq!(reference.as_str(), input);
    }

    #[rstest]
    #[case("", DonationValidationError::EmptyReference)]
    #[case("has spaces", DonationValidationError::MalformedReference)]
    #[case("semi;colon", DonationValidationError::MalformedReference)]
    fn invalid_references_are_rejected(
        #[case] input: &str,
        #[case] expected: DonationValidationError,
    ) {
        let err = DonationReference::new(input).expect_err("invalid reference must fail");
        assert_eq!(err, expected);
    }

    #[test]
    fn oversized_references_are_rejected() {
        let err = DonationReference::new(&"x".repeat(REFERENCE_MAX_LEN + 1))
            .expect_err("oversized reference must fail");
        assert_eq!(
            err,
            DonationValidationError::ReferenceTooLong {
                max: REFERENCE_MAX_LEN
            }
        );
    }

    #[test]
    fn sources_round_trip_through_text() {
        for source in [
            DonationSource::Checkout,
            DonationSource::Webhook,
            DonationSource::Seed,
        ] {
            assert_eq!(DonationSource::parse(source.as_str()), Some(source));
        }
        assert_eq!(DonationSource::parse("unknown"), None);
    }
}
