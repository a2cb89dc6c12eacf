//! LMDB implementation of PurchaseStore.

use parcel_store::{PurchaseRequest, PurchaseStore, StoreError};

use crate::store::LmdbStore;

impl PurchaseStore for LmdbStore {
    fn get_purchase(&self, id: u64) -> Result<PurchaseRequest, StoreError> {
        self.get_record(
            self.env.purchases_db,
            &id.to_be_bytes(),
            &format!("purchase {id}"),
        )
    }

    fn put_purchase(&self, purchase: &PurchaseRequest) -> Result<(), StoreError> {
        self.put_record(self.env.purchases_db, &purchase.id.to_be_bytes(), purchase)
    }

    fn iter_purchases(&self) -> Result<Vec<PurchaseRequest>, StoreError> {
        self.iter_records(self.env.purchases_db)
    }

    fn next_purchase_id(&self) -> Result<u64, StoreError> {
        Ok(self.env.next_counter("next_purchase_id")?)
    }
}
