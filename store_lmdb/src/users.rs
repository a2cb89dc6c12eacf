//! LMDB implementation of UserStore.

use parcel_store::{StoreError, User, UserStore};
use parcel_types::LedgerAddress;

use crate::store::LmdbStore;

impl UserStore for LmdbStore {
    fn get_user(&self, name: &str) -> Result<User, StoreError> {
        self.get_record(self.env.users_db, name.as_bytes(), &format!("user {name}"))
    }

    fn put_user(&self, user: &User) -> Result<(), StoreError> {
        self.put_record(self.env.users_db, user.name.as_bytes(), user)
    }

    fn exists(&self, name: &str) -> Result<bool, StoreError> {
        self.exists_record(self.env.users_db, name.as_bytes())
    }

    fn get_by_address(&self, address: &LedgerAddress) -> Result<User, StoreError> {
        self.iter_users()?
            .into_iter()
            .find(|u| &u.address == address)
            .ok_or_else(|| StoreError::NotFound(address.to_string()))
    }

    fn iter_users(&self) -> Result<Vec<User>, StoreError> {
        self.iter_records(self.env.users_db)
    }
}
