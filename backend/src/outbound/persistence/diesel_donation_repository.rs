//! Diesel-backed donation ledger adapter.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::Donation;
use crate::domain::money::Amount;
use crate::domain::ports::{DonationRepository, DonationStoreError};

use super::models::DonationRow;
use super::pool::{DbPool, PoolError};
use super::schema::donations;

/// Donation ledger persisted in PostgreSQL.
#[derive(Clone)]
pub struct DieselDonationLedger {
    pool: DbPool,
}

impl DieselDonationLedger {
    /// Create a ledger adapter over the shared pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn load_rows(&self, limit: Option<i64>) -> Result<Vec<DonationRow>, DonationStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let query = donations::table
            .select(DonationRow::as_select())
            .order(donations::created_at.desc());
        let rows = match limit {
            Some(limit) => query.limit(limit).load(&mut conn).await,
            None => query.load(&mut conn).await,
        };
        rows.map_err(map_query_error)
    }
}

#[async_trait]
impl DonationRepository for DieselDonationLedger {
    async fn record(&self, donation: &Donation) -> Result<(), DonationStoreError> {
        let row = DonationRow::from_domain(donation);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(donations::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_query_error)?;
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<Donation>, DonationStoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = self.load_rows(Some(limit)).await?;
        rows.into_iter().map(DonationRow::into_domain).collect()
    }

    async fn all(&self) -> Result<Vec<Donation>, DonationStoreError> {
        let rows = self.load_rows(None).await?;
        rows.into_iter().map(DonationRow::into_domain).collect()
    }

    async fn total_raised(&self) -> Result<Amount, DonationStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let amounts: Vec<i64> = donations::table
            .select(donations::amount_kobo)
            .load(&mut conn)
            .await
            .map_err(map_query_error)?;

        let mut total = Amount::ZERO;
        for kobo in amounts {
            let amount = Amount::from_kobo(kobo)?;
            total = total.checked_add(amount)?;
        }
        Ok(total)
    }
}

fn map_pool_error(error: PoolError) -> DonationStoreError {
    DonationStoreError::connection(error.to_string())
}

fn map_query_error(error: diesel::result::Error) -> DonationStoreError {
    DonationStoreError::query(error.to_string())
}
