//! Wire DTOs for the gateway's transaction-verify endpoint.

use serde::Deserialize;

use crate::domain::money::Amount;
use crate::domain::ports::VerifiedCharge;
use crate::domain::{DonationReference, EmailAddress};

/// Top-level verify response envelope.
///
/// The envelope `status` reports whether the lookup itself worked; the
/// charge outcome lives in `data.status`.
#[derive(Debug, Deserialize)]
pub(super) struct VerifyResponseDto {
    status: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<TransactionDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TransactionDto {
    #[serde(default)]
    status: Option<String>,
    reference: String,
    amount: i64,
    customer: CustomerDto,
}

#[derive(Debug, Deserialize)]
struct CustomerDto {
    email: String,
}

impl VerifyResponseDto {
    /// Map the wire shape into a domain charge.
    ///
    /// Returns a human-readable description of the defect on failure; the
    /// adapter wraps it into its decode error.
    pub(super) fn into_verified_charge(self) -> Result<VerifiedCharge, String> {
        if !self.status {
            let message = self
                .message
                .unwrap_or_else(|| "gateway reported a failed lookup".to_owned());
            return Err(message);
        }
        let data = self
            .data
            .ok_or_else(|| "verify response carried no transaction data".to_owned())?;

        let reference = DonationReference::new(&data.reference)
            .map_err(|error| format!("transaction reference: {error}"))?;
        let amount =
            Amount::from_kobo(data.amount).map_err(|error| format!("transaction amount: {error}"))?;
        let email = EmailAddress::new(&data.customer.email)
            .map_err(|error| format!("customer email: {error}"))?;
        let succeeded = data.status.as_deref() == Some("success");

        Ok(VerifiedCharge {
            reference,
            amount,
            email,
            succeeded,
        })
    }
}
