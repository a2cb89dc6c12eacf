//! LMDB implementation of MortgageRequestStore.

use parcel_store::{MortgageRequest, MortgageRequestStore, StoreError};

use crate::store::LmdbStore;

impl MortgageRequestStore for LmdbStore {
    fn get_request(&self, id: u64) -> Result<MortgageRequest, StoreError> {
        self.get_record(
            self.env.mortgage_requests_db,
            &id.to_be_bytes(),
            &format!("mortgage request {id}"),
        )
    }

    fn put_request(&self, request: &MortgageRequest) -> Result<(), StoreError> {
        self.put_record(
            self.env.mortgage_requests_db,
            &request.id.to_be_bytes(),
            request,
        )
    }

    fn iter_requests(&self) -> Result<Vec<MortgageRequest>, StoreError> {
        self.iter_records(self.env.mortgage_requests_db)
    }

    fn next_request_id(&self) -> Result<u64, StoreError> {
        Ok(self.env.next_counter("next_mortgage_request_id")?)
    }
}
