//! Gateway webhook authentication and event decoding.
//!
//! The gateway signs every callback with HMAC-SHA512 over the raw request
//! body using the shared secret, and sends the hex digest in the
//! `x-paystack-signature` header. Verification must run against the bytes
//! exactly as received; re-serialising the JSON would change the digest.

use hmac::{Hmac, Mac};
use sha2::Sha512;
use zeroize::Zeroizing;

use super::donation::{DonationReference, EmailAddress};
use super::money::Amount;

type HmacSha512 = Hmac<Sha512>;

/// Shared webhook signing secret.
///
/// The secret is wiped from memory on drop.
#[derive(Clone)]
pub struct WebhookSecret(Zeroizing<String>);

/// Validation error raised when the webhook secret is blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptySecretError;

impl std::fmt::Display for EmptySecretError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "webhook secret must not be empty")
    }
}

impl std::error::Error for EmptySecretError {}

impl WebhookSecret {
    /// Validate and wrap the shared secret.
    ///
    /// # Errors
    ///
    /// Returns [`EmptySecretError`] when the secret is blank once trimmed.
    pub fn new(secret: impl Into<String>) -> Result<Self, EmptySecretError> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err(EmptySecretError);
        }
        Ok(Self(Zeroizing::new(secret)))
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl std::fmt::Debug for WebhookSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("WebhookSecret(***)")
    }
}

/// Failures raised while checking a webhook signature.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    /// The signature header was missing or not a hex digest.
    #[error("signature header is missing or malformed")]
    Malformed,
    /// The digest did not match the request body.
    #[error("signature does not match the request body")]
    Mismatch,
}

/// Verify the gateway signature over the raw request body.
///
/// The comparison runs in constant time via the MAC's own verification, so
/// the check does not leak how many digest bytes matched.
///
/// # Errors
///
/// Returns [`SignatureError::Malformed`] for non-hex headers and
/// [`SignatureError::Mismatch`] when the digest differs.
pub fn verify_signature(
    secret: &WebhookSecret,
    body: &[u8],
    signature_hex: &str,
) -> Result<(), SignatureError> {
    let provided = hex::decode(signature_hex.trim()).map_err(|_| SignatureError::Malformed)?;
    // HMAC accepts keys of any length, so construction cannot fail here.
    let mut mac =
        HmacSha512::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::Malformed)?;
    mac.update(body);
    mac.verify_slice(&provided)
        .map_err(|_| SignatureError::Mismatch)
}

/// A decoded webhook callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEvent {
    /// A successful charge the ledger should record.
    ChargeSuccess(ChargeNotification),
    /// Any other event type; acknowledged and ignored.
    Ignored {
        /// Event name as sent by the gateway.
        event: String,
    },
}

/// Charge details extracted from a `charge.success` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeNotification {
    /// Gateway transaction reference.
    pub reference: DonationReference,
    /// Charged amount in kobo.
    pub amount: Amount,
    /// Customer email on the charge.
    pub email: EmailAddress,
}

/// Failures raised while decoding a webhook body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WebhookParseError {
    /// The body was not the expected JSON envelope.
    #[error("webhook body is not valid JSON: {message}")]
    InvalidJson {
        /// Decoder error text.
        message: String,
    },
    /// A `charge.success` event carried unusable charge data.
    #[error("charge payload is not usable: {message}")]
    InvalidCharge {
        /// Validation error text.
        message: String,
    },
}

#[derive(serde::Deserialize)]
struct EnvelopeDto {
    event: String,
    data: Option<ChargeDataDto>,
}

#[derive(serde::Deserialize)]
struct ChargeDataDto {
    reference: String,
    amount: i64,
    customer: CustomerDto,
}

#[derive(serde::Deserialize)]
struct CustomerDto {
    email: String,
}

impl WebhookEvent {
    /// Decode a verified webhook body.
    ///
    /// Only `charge.success` events are interpreted; everything else is
    /// surfaced as [`WebhookEvent::Ignored`] so the handler can acknowledge
    /// without acting.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookParseError::InvalidJson`] when the envelope does not
    /// decode and [`WebhookParseError::InvalidCharge`] when a success event
    /// carries missing or invalid charge fields.
    pub fn parse(body: &[u8]) -> Result<Self, WebhookParseError> {
        let envelope: EnvelopeDto =
            serde_json::from_slice(body).map_err(|error| WebhookParseError::InvalidJson {
                message: error.to_string(),
            })?;

        if envelope.event != "charge.success" {
            return Ok(Self::Ignored {
                event: envelope.event,
            });
        }

        let data = envelope
            .data
            .ok_or_else(|| WebhookParseError::InvalidCharge {
                message: "charge.success event carried no data".to_owned(),
            })?;
        let invalid_charge = |message: String| WebhookParseError::InvalidCharge { message };

        let reference = DonationReference::new(&data.reference)
            .map_err(|error| invalid_charge(error.to_string()))?;
        let amount =
            Amount::from_kobo(data.amount).map_err(|error| invalid_charge(error.to_string()))?;
        let email = EmailAddress::new(&data.customer.email)
            .map_err(|error| invalid_charge(error.to_string()))?;

        Ok(Self::ChargeSuccess(ChargeNotification {
            reference,
            amount,
            email,
        }))
    }
}
