//! Write batching — groups multiple store operations into a single LMDB
//! write transaction.
//!
//! The off-plan funding transition must flip the property status and insert
//! the final purchase together; committing them in one transaction means a
//! crash cannot leave the property `for_sale` with a purchase that already
//! filled it (or vice versa).
//!
//! If the batch is dropped without calling [`WriteBatch::commit`], all
//! operations are rolled back (the underlying LMDB transaction is aborted).

use heed::RwTxn;

use parcel_store::{OffPlanProperty, PurchaseRequest, StoreError};

use crate::environment::LmdbEnvironment;
use crate::error::LmdbError;

/// A write batch over the gateway's LMDB environment.
pub struct WriteBatch<'a> {
    txn: RwTxn<'a>,
    env: &'a LmdbEnvironment,
}

impl<'a> WriteBatch<'a> {
    /// Begin a new write batch.
    pub(crate) fn new(env: &'a LmdbEnvironment) -> Result<Self, StoreError> {
        let txn = env.env().write_txn().map_err(LmdbError::from)?;
        Ok(Self { txn, env })
    }

    /// Put an off-plan property into the batch.
    pub fn put_property(&mut self, property: &OffPlanProperty) -> Result<(), StoreError> {
        let bytes =
            bincode::serialize(property).map_err(|e| LmdbError::Serialization(e.to_string()))?;
        self.env
            .properties_db
            .put(&mut self.txn, &property.id.to_be_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        Ok(())
    }

    /// Put a purchase request into the batch.
    pub fn put_purchase(&mut self, purchase: &PurchaseRequest) -> Result<(), StoreError> {
        let bytes =
            bincode::serialize(purchase).map_err(|e| LmdbError::Serialization(e.to_string()))?;
        self.env
            .purchases_db
            .put(&mut self.txn, &purchase.id.to_be_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        Ok(())
    }

    /// Commit every batched operation atomically.
    pub fn commit(self) -> Result<(), StoreError> {
        self.txn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}

impl parcel_store::OffPlanBatchStore for crate::store::LmdbStore {
    fn commit_funding(
        &self,
        property: &OffPlanProperty,
        purchase: &PurchaseRequest,
    ) -> Result<(), StoreError> {
        let mut batch = self.write_batch()?;
        batch.put_property(property)?;
        batch.put_purchase(purchase)?;
        batch.commit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::LmdbStore;
    use parcel_store::{PropertyStatus, PropertyStore, PurchaseStore};
    use parcel_types::Timestamp;

    fn property(id: u64, status: PropertyStatus) -> OffPlanProperty {
        OffPlanProperty {
            id,
            developer: "dev".into(),
            address: "1 Quay St".into(),
            region: "west".into(),
            value: 1_000_000,
            total_shares: 1000,
            status,
            created_at: Timestamp::new(1),
        }
    }

    fn purchase(id: u64, property_id: u64) -> PurchaseRequest {
        PurchaseRequest {
            id,
            property_id,
            user: "alice".into(),
            amount_usd: 400_000,
            percent_bps: 4000,
            created_at: Timestamp::new(2),
        }
    }

    #[test]
    fn committed_batch_is_visible() {
        let dir = tempfile::tempdir().unwrap();
        let store = LmdbStore::open(dir.path()).unwrap();

        let mut batch = store.write_batch().unwrap();
        batch
            .put_property(&property(1, PropertyStatus::PendingRegulatorApproval))
            .unwrap();
        batch.put_purchase(&purchase(1, 1)).unwrap();
        batch.commit().unwrap();

        assert_eq!(
            store.get_property(1).unwrap().status,
            PropertyStatus::PendingRegulatorApproval
        );
        assert_eq!(store.get_purchase(1).unwrap().amount_usd, 400_000);
    }

    #[test]
    fn dropped_batch_rolls_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = LmdbStore::open(dir.path()).unwrap();

        {
            let mut batch = store.write_batch().unwrap();
            batch.put_property(&property(1, PropertyStatus::ForSale)).unwrap();
            // No commit.
        }

        assert!(store.get_property(1).is_err());
    }
}
