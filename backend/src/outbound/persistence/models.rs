//! Row types bridging the `donations` table and the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::money::Amount;
use crate::domain::ports::DonationStoreError;
use crate::domain::{Donation, DonationReference, DonationSource, EmailAddress};

use super::schema::donations;

/// One row of the donation ledger.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = donations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DonationRow {
    /// Ledger row identifier.
    pub id: Uuid,
    /// Donor email address.
    pub email: String,
    /// Contribution amount in kobo.
    pub amount_kobo: i64,
    /// Gateway transaction reference.
    pub reference: String,
    /// Donation source token.
    pub source: String,
    /// When the donation was recorded.
    pub created_at: DateTime<Utc>,
}

impl DonationRow {
    /// Flatten a domain donation into its row form.
    #[must_use]
    pub fn from_domain(donation: &Donation) -> Self {
        Self {
            id: donation.id(),
            email: donation.email().as_str().to_owned(),
            amount_kobo: donation.amount().kobo(),
            reference: donation.reference().as_str().to_owned(),
            source: donation.source().as_str().to_owned(),
            created_at: donation.created_at(),
        }
    }

    /// Re-validate a row into the domain type.
    ///
    /// Rows are written through the domain constructors, so a failure here
    /// means the table was edited out-of-band; it surfaces as a query error.
    ///
    /// # Errors
    ///
    /// Returns [`DonationStoreError::Query`] naming the offending column.
    pub fn into_domain(self) -> Result<Donation, DonationStoreError> {
        let email = EmailAddress::new(&self.email)
            .map_err(|error| bad_column(self.id, "email", &error.to_string()))?;
        let amount = Amount::from_kobo(self.amount_kobo)
            .map_err(|error| bad_column(self.id, "amount_kobo", &error.to_string()))?;
        let reference = DonationReference::new(&self.reference)
            .map_err(|error| bad_column(self.id, "reference", &error.to_string()))?;
        let source = DonationSource::parse(&self.source)
            .ok_or_else(|| bad_column(self.id, "source", "unknown source token"))?;
        Ok(Donation::new(
            self.id,
            email,
            amount,
            reference,
            source,
            self.created_at,
        ))
    }
}

fn bad_column(id: Uuid, column: &str, detail: &str) -> DonationStoreError {
    DonationStoreError::query(format!("donation {id} has invalid {column}: {detail}"))
}
