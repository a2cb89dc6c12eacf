//! LMDB implementation of MetaStore.

use parcel_store::{MetaStore, StoreError};

use crate::store::LmdbStore;

impl MetaStore for LmdbStore {
    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.put_record(self.env.meta_db, key.as_bytes(), &value.to_vec())
    }

    fn get_meta(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.get_record(self.env.meta_db, key.as_bytes(), &format!("meta key '{key}'"))
    }

    fn delete_meta(&self, key: &str) -> Result<(), StoreError> {
        self.delete_record(self.env.meta_db, key.as_bytes())
    }
}
