//! Port abstraction for the donation ledger and its in-memory fallback.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::money::{Amount, AmountError};
use crate::domain::Donation;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by donation ledger adapters.
    pub enum DonationStoreError {
        /// Ledger connection could not be established.
        Connection => "donation ledger connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "donation ledger query failed: {message}",
    }
}

impl From<AmountError> for DonationStoreError {
    fn from(error: AmountError) -> Self {
        Self::query(error.to_string())
    }
}

/// Driven port over the donation ledger.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DonationRepository: Send + Sync {
    /// Append a donation to the ledger.
    async fn record(&self, donation: &Donation) -> Result<(), DonationStoreError>;

    /// The most recent donations, newest first, at most `limit` entries.
    async fn recent(&self, limit: usize) -> Result<Vec<Donation>, DonationStoreError>;

    /// Every donation, newest first.
    async fn all(&self) -> Result<Vec<Donation>, DonationStoreError>;

    /// Sum of all recorded amounts.
    async fn total_raised(&self) -> Result<Amount, DonationStoreError>;
}

/// In-memory ledger used when no database is configured.
///
/// This is the production fallback, not just a test double: the original
/// deployment kept its donor list in process memory, and small installs
/// still run that way. Entries are held newest first.
#[derive(Debug, Default)]
pub struct MemoryDonationLedger {
    entries: RwLock<Vec<Donation>>,
}

impl MemoryDonationLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger pre-populated with `entries` (newest first).
    #[must_use]
    pub fn seeded(entries: Vec<Donation>) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }
}

#[async_trait]
impl DonationRepository for MemoryDonationLedger {
    async fn record(&self, donation: &Donation) -> Result<(), DonationStoreError> {
        let mut entries = self.entries.write().await;
        entries.insert(0, donation.clone());
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<Donation>, DonationStoreError> {
        let entries = self.entries.read().await;
        Ok(entries.iter().take(limit).cloned().collect())
    }

    async fn all(&self) -> Result<Vec<Donation>, DonationStoreError> {
        let entries = self.entries.read().await;
        Ok(entries.clone())
    }

    async fn total_raised(&self) -> Result<Amount, DonationStoreError> {
        let entries = self.entries.read().await;
        let mut total = Amount::ZERO;
        for donation in entries.iter() {
            total = total.checked_add(donation.amount())?;
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the in-memory ledger.

    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use crate::domain::{DonationReference, DonationSource, EmailAddress};

    use super::*;

    fn donation(email: &str, kobo: i64, reference: &str) -> Donation {
        Donation::new(
            Uuid::new_v4(),
            EmailAddress::new(email).expect("valid email"),
            Amount::from_kobo(kobo).expect("non-negative"),
            DonationReference::new(reference).expect("valid reference"),
            DonationSource::Checkout,
            Utc.with_ymd_and_hms(2025, 10, 8, 12, 0, 0).single().expect("valid timestamp"),
        )
    }

    #[tokio::test]
    async fn records_are_returned_newest_first() {
        let ledger = MemoryDonationLedger::new();
        ledger
            .record(&donation("first@example.com", 5000, "ref-1"))
            .await
            .expect("record succeeds");
        ledger
            .record(&donation("second@example.com", 2500, "ref-2"))
            .await
            .expect("record succeeds");

        let recent = ledger.recent(5).await.expect("recent succeeds");
        let emails: Vec<&str> = recent.iter().map(|d| d.email().as_str()).collect();
        assert_eq!(emails, vec!["second@example.com", "first@example.com"]);
    }

    #[tokio::test]
    async fn recent_respects_the_limit() {
        let ledger = MemoryDonationLedger::seeded(vec![
            donation("a@example.com", 100, "ref-a"),
            donation("b@example.com", 200, "ref-b"),
            donation("c@example.com", 300, "ref-c"),
        ]);
        let recent = ledger.recent(2).await.expect("recent succeeds");
        assert_eq!(recent.len(), 2);
    }

    #[tokio::test]
    async fn totals_accumulate_across_entries() {
        let ledger = MemoryDonationLedger::seeded(vec![
            donation("a@example.com", 5000, "ref-a"),
            donation("b@example.com", 10_000, "ref-b"),
        ]);
        let total = ledger.total_raised().await.expect("total succeeds");
        assert_eq!(total.kobo(), 15_000);
    }

    #[tokio::test]
    async fn empty_ledger_totals_zero() {
        let ledger = MemoryDonationLedger::new();
        let total = ledger.total_raised().await.expect("total succeeds");
        assert!(total.is_zero());
    }
}
