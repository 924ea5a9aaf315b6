//! # Customer Repository
//!
//! Store operations for customers and their fiado tabs.
//!
//! Edits go through `PATCH` with only the fields that changed; the
//! movement list is always sent whole.

use serde::Serialize;
use tracing::debug;

use crate::error::StoreResult;
use crate::store::StoreHttp;
use bodega_core::{Customer, Movement, RecordId};

const ENTITY: &str = "Customer";
const COLLECTION: &str = "customers";

/// Partial customer update.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CustomerPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub movements: Option<Vec<Movement>>,
}

impl CustomerPatch {
    /// Patch that rewrites only the movement list.
    pub fn movements(movements: Vec<Movement>) -> Self {
        CustomerPatch {
            name: None,
            movements: Some(movements),
        }
    }

    /// Patch carrying the customer's current name and movements.
    pub fn from_customer(customer: &Customer) -> Self {
        CustomerPatch {
            name: Some(customer.name.clone()),
            movements: Some(customer.movements.clone()),
        }
    }
}

/// Repository for customer records.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    http: StoreHttp,
}

impl CustomerRepository {
    pub(crate) fn new(http: StoreHttp) -> Self {
        CustomerRepository { http }
    }

    /// Returns every customer in store order.
    pub async fn list(&self) -> StoreResult<Vec<Customer>> {
        debug!("Listing customers");

        let url = self.http.url(&[COLLECTION])?;
        self.http
            .fetch(self.http.client.get(url), ENTITY, None)
            .await
    }

    /// Gets a customer by id.
    pub async fn get(&self, id: &RecordId) -> StoreResult<Customer> {
        debug!(id = %id, "Getting customer");

        let id = id.to_string();
        let url = self.http.url(&[COLLECTION, &id])?;
        self.http
            .fetch(self.http.client.get(url), ENTITY, Some(&id))
            .await
    }

    /// Creates a customer. The id is chosen by the caller.
    pub async fn insert(&self, customer: &Customer) -> StoreResult<Customer> {
        debug!(
            id = %customer.id,
            movements = customer.movements.len(),
            "Inserting customer"
        );

        let url = self.http.url(&[COLLECTION])?;
        self.http
            .fetch(self.http.client.post(url).json(customer), ENTITY, None)
            .await
    }

    /// Applies a partial update and returns the stored record.
    pub async fn patch(&self, id: &RecordId, patch: &CustomerPatch) -> StoreResult<Customer> {
        debug!(
            id = %id,
            name = patch.name.is_some(),
            movements = patch.movements.as_ref().map(Vec::len),
            "Patching customer"
        );

        let id = id.to_string();
        let url = self.http.url(&[COLLECTION, &id])?;
        self.http
            .fetch(self.http.client.patch(url).json(patch), ENTITY, Some(&id))
            .await
    }

    /// Writes the customer's name and movements back to the store.
    pub async fn save(&self, customer: &Customer) -> StoreResult<Customer> {
        self.patch(&customer.id, &CustomerPatch::from_customer(customer))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bodega_core::Money;

    #[test]
    fn test_patch_skips_absent_fields() {
        let patch = CustomerPatch::movements(vec![Movement::payment("Abono", Money::from_int(5))]);
        let json = serde_json::to_value(&patch).unwrap();

        assert!(json.get("name").is_none());
        assert_eq!(json["movements"][0]["amount"], serde_json::json!(-5.0));
    }
}
