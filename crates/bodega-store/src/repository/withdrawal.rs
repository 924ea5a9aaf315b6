//! # Withdrawal Repository
//!
//! Store operations for profit withdrawals.
//!
//! The collection may not exist on a fresh store. A non-success answer
//! to the list request is read as "no withdrawals yet".

use tracing::{debug, warn};

use crate::error::StoreResult;
use crate::store::StoreHttp;
use bodega_core::{NewWithdrawal, Withdrawal};

const ENTITY: &str = "Withdrawal";
const COLLECTION: &str = "withdrawals";

/// Repository for withdrawal records.
#[derive(Debug, Clone)]
pub struct WithdrawalRepository {
    http: StoreHttp,
}

impl WithdrawalRepository {
    pub(crate) fn new(http: StoreHttp) -> Self {
        WithdrawalRepository { http }
    }

    /// Returns every withdrawal; empty when the collection is missing.
    pub async fn list(&self) -> StoreResult<Vec<Withdrawal>> {
        debug!("Listing withdrawals");

        let url = self.http.url(&[COLLECTION])?;
        let response = self.http.client.get(url).send().await?;

        if !response.status().is_success() {
            warn!(
                status = response.status().as_u16(),
                "Withdrawals collection unavailable, treating as empty"
            );
            return Ok(Vec::new());
        }

        Ok(response.json().await?)
    }

    /// Records a withdrawal; the store assigns the id.
    pub async fn insert(&self, withdrawal: &NewWithdrawal) -> StoreResult<Withdrawal> {
        debug!(amount = %withdrawal.amount, "Inserting withdrawal");

        let url = self.http.url(&[COLLECTION])?;
        self.http
            .fetch(self.http.client.post(url).json(withdrawal), ENTITY, None)
            .await
    }
}
