//! Driven port for payment verification against the hosted gateway.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::money::Amount;
use crate::domain::{DonationReference, EmailAddress};

use super::define_port_error;

define_port_error! {
    /// Failures raised by payment gateway adapters.
    pub enum PaymentGatewayError {
        /// The gateway did not recognise the reference or refused the request.
        InvalidReference => "gateway rejected the reference: {message}",
        /// The gateway throttled the caller.
        RateLimited => "gateway rate limited the request: {message}",
        /// The request timed out.
        Timeout => "gateway request timed out: {message}",
        /// Transport-level failure reaching the gateway.
        Transport => "gateway request failed: {message}",
        /// The gateway response could not be decoded.
        Decode => "gateway response could not be decoded: {message}",
    }
}

/// A charge as reported by the gateway's verify endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedCharge {
    /// Gateway transaction reference.
    pub reference: DonationReference,
    /// Charged amount in kobo.
    pub amount: Amount,
    /// Customer email on the charge.
    pub email: EmailAddress,
    /// Whether the gateway marked the charge successful.
    pub succeeded: bool,
}

/// Driven port over the gateway's transaction-verify endpoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Look up a charge by reference.
    async fn verify(
        &self,
        reference: &DonationReference,
    ) -> Result<VerifiedCharge, PaymentGatewayError>;
}

/// In-memory gateway for tests and local development.
///
/// Knows only the charges it was seeded with; everything else maps to
/// [`PaymentGatewayError::InvalidReference`], matching how the hosted
/// gateway answers unknown references.
#[derive(Debug, Default)]
pub struct FixturePaymentGateway {
    charges: HashMap<String, VerifiedCharge>,
}

impl FixturePaymentGateway {
    /// Create an empty fixture gateway.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the fixture with a charge.
    #[must_use]
    pub fn with_charge(mut self, charge: VerifiedCharge) -> Self {
        self.charges
            .insert(charge.reference.as_str().to_owned(), charge);
        self
    }
}

#[async_trait]
impl PaymentGateway for FixturePaymentGateway {
    async fn verify(
        &self,
        reference: &DonationReference,
    ) -> Result<VerifiedCharge, PaymentGatewayError> {
        self.charges
            .get(reference.as_str())
            .cloned()
            .ok_or_else(|| {
                PaymentGatewayError::invalid_reference(format!(
                    "no transaction with reference {reference}"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the fixture gateway.

    use super::*;

    fn charge(reference: &str, kobo: i64, succeeded: bool) -> VerifiedCharge {
        VerifiedCharge {
            reference: DonationReference::new(reference).expect("valid reference"),
            amount: Amount::from_kobo(kobo).expect("non-negative"),
            email: EmailAddress::new("grace@example.com").expect("valid email"),
            succeeded,
        }
    }

    #[tokio::test]
    async fn seeded_charges_are_returned() {
        let gateway = FixturePaymentGateway::new().with_charge(charge("ref-1", 5000, true));
        let reference = DonationReference::new("ref-1").expect("valid reference");
        let verified = gateway.verify(&reference).await.expect("charge is known");
        assert_eq!(verified.amount.kobo(), 5000);
        assert!(verified.succeeded);
    }

    #[tokio::test]
    async fn unknown_references_are_rejected() {
        let gateway = FixturePaymentGateway::new();
        let reference = DonationReference::new("missing").expect("valid reference");
        let err = gateway
            .verify(&reference)
            .await
            .expect_err("charge is unknown");
        assert!(matches!(err, PaymentGatewayError::InvalidReference { .. }));
    }
}
