//! User storage trait.

use crate::StoreError;
use parcel_types::{LedgerAddress, Role, Timestamp};
use serde::{Deserialize, Serialize};

/// A registered gateway user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identity name; doubles as the signing-key name in the keyring.
    pub name: String,
    /// The user's ledger address.
    pub address: LedgerAddress,
    /// Current role. Transitions are one-directional promotions.
    pub role: Role,
    pub registered_at: Timestamp,
}

/// Trait for user storage operations.
pub trait UserStore {
    fn get_user(&self, name: &str) -> Result<User, StoreError>;
    fn put_user(&self, user: &User) -> Result<(), StoreError>;
    fn exists(&self, name: &str) -> Result<bool, StoreError>;
    fn get_by_address(&self, address: &LedgerAddress) -> Result<User, StoreError>;
    fn iter_users(&self) -> Result<Vec<User>, StoreError>;
}
