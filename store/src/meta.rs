//! Gateway metadata storage trait (schema version, counters).

use crate::StoreError;

/// Trait for small key/value metadata the backend itself needs.
pub trait MetaStore {
    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;
    fn get_meta(&self, key: &str) -> Result<Vec<u8>, StoreError>;
    fn delete_meta(&self, key: &str) -> Result<(), StoreError>;
}
