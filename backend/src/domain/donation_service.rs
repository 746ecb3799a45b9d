//! Donation use-cases: progress, donor feed, checkout verification, and
//! webhook recording.
//!
//! Handlers stay thin by delegating here; this service owns the one rule
//! the ledger cares about: a donation is recorded only when the gateway
//! confirmed the charge and the confirmed amount matches what the client
//! claimed.

use std::sync::Arc;

use mockable::Clock;
use uuid::Uuid;

use super::campaign::{CampaignProgress, FundraisingGoal};
use super::donation::{Donation, DonationReference, DonationSource};
use super::error::DomainError;
use super::money::Amount;
use super::ports::{DonationRepository, DonationStoreError, PaymentGateway, PaymentGatewayError};
use super::webhook::ChargeNotification;

/// Result of a checkout verification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// The gateway confirmed the charge and the donation was recorded.
    Recorded(Donation),
    /// The gateway answered but did not confirm the claimed charge.
    Rejected {
        /// Human-readable reason surfaced to the client.
        message: String,
    },
}

/// Donation use-case service bundling the ledger, gateway, and goal.
#[derive(Clone)]
pub struct DonationService {
    ledger: Arc<dyn DonationRepository>,
    gateway: Arc<dyn PaymentGateway>,
    goal: FundraisingGoal,
    clock: Arc<dyn Clock>,
}

impl DonationService {
    /// Assemble the service from its ports and the configured goal.
    #[must_use]
    pub fn new(
        ledger: Arc<dyn DonationRepository>,
        gateway: Arc<dyn PaymentGateway>,
        goal: FundraisingGoal,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            ledger,
            gateway,
            goal,
            clock,
        }
    }

    /// Current campaign progress.
    ///
    /// # Errors
    ///
    /// Maps ledger failures to [`DomainError`].
    pub async fn progress(&self) -> Result<CampaignProgress, DomainError> {
        let raised = self
            .ledger
            .total_raised()
            .await
            .map_err(map_store_error)?;
        Ok(CampaignProgress::compute(raised, self.goal))
    }

    /// The most recent donations, newest first.
    ///
    /// # Errors
    ///
    /// Maps ledger failures to [`DomainError`].
    pub async fn recent_donations(&self, limit: usize) -> Result<Vec<Donation>, DomainError> {
        self.ledger.recent(limit).await.map_err(map_store_error)
    }

    /// Every donation, newest first (admin listing and export).
    ///
    /// # Errors
    ///
    /// Maps ledger failures to [`DomainError`].
    pub async fn all_donations(&self) -> Result<Vec<Donation>, DomainError> {
        self.ledger.all().await.map_err(map_store_error)
    }

    /// Verify a checkout charge against the gateway and record it.
    ///
    /// The donation is recorded only when the gateway confirms the charge
    /// as successful AND its amount equals `claimed`. A gateway answer that
    /// denies either condition is a business rejection, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError`] with code `upstream_unavailable` when the
    /// gateway cannot be reached or answers garbage, and maps ledger
    /// failures likewise.
    pub async fn verify_and_record(
        &self,
        reference: DonationReference,
        claimed: Amount,
    ) -> Result<VerificationOutcome, DomainError> {
        let charge = match self.gateway.verify(&reference).await {
            Ok(charge) => charge,
            Err(PaymentGatewayError::InvalidReference { message }) => {
                tracing::info!(reference = %reference, %message, "gateway rejected reference");
                return Ok(VerificationOutcome::Rejected {
                    message: "Verification failed".to_owned(),
                });
            }
            Err(error) => return Err(map_gateway_error(&error)),
        };

        if !charge.succeeded {
            return Ok(VerificationOutcome::Rejected {
                message: "Verification failed".to_owned(),
            });
        }
        if charge.amount != claimed {
            tracing::warn!(
                reference = %reference,
                claimed = claimed.kobo(),
                verified = charge.amount.kobo(),
                "claimed amount does not match verified charge"
            );
            return Ok(VerificationOutcome::Rejected {
                message: "Verification failed".to_owned(),
            });
        }

        let donation = Donation::new(
            Uuid::new_v4(),
            charge.email,
            charge.amount,
            reference,
            DonationSource::Checkout,
            self.clock.utc(),
        );
        self.ledger
            .record(&donation)
            .await
            .map_err(map_store_error)?;
        Ok(VerificationOutcome::Recorded(donation))
    }

    /// Record a donation announced by a verified `charge.success` webhook.
    ///
    /// # Errors
    ///
    /// Maps ledger failures to [`DomainError`].
    pub async fn record_webhook_charge(
        &self,
        charge: ChargeNotification,
    ) -> Result<Donation, DomainError> {
        let donation = Donation::new(
            Uuid::new_v4(),
            charge.email,
            charge.amount,
            charge.reference,
            DonationSource::Webhook,
            self.clock.utc(),
        );
        self.ledger
            .record(&donation)
            .await
            .map_err(map_store_error)?;
        Ok(donation)
    }
}

fn map_store_error(error: DonationStoreError) -> DomainError {
    match error {
        DonationStoreError::Connection { message } => {
            DomainError::upstream_unavailable(message)
        }
        DonationStoreError::Query { message } => DomainError::internal(message),
    }
}

fn map_gateway_error(error: &PaymentGatewayError) -> DomainError {
    DomainError::upstream_unavailable(error.to_string())
}
