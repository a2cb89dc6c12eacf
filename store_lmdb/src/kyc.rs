//! LMDB implementation of KycStore.

use parcel_store::{KycRequest, KycStore, StoreError};

use crate::store::LmdbStore;

impl KycStore for LmdbStore {
    fn get_kyc(&self, id: u64) -> Result<KycRequest, StoreError> {
        self.get_record(
            self.env.kyc_db,
            &id.to_be_bytes(),
            &format!("kyc request {id}"),
        )
    }

    fn put_kyc(&self, request: &KycRequest) -> Result<(), StoreError> {
        self.put_record(self.env.kyc_db, &request.id.to_be_bytes(), request)
    }

    fn iter_kyc(&self) -> Result<Vec<KycRequest>, StoreError> {
        self.iter_records(self.env.kyc_db)
    }

    fn next_kyc_id(&self) -> Result<u64, StoreError> {
        Ok(self.env.next_counter("next_kyc_id")?)
    }
}
