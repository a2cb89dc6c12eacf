//! The LMDB-backed store handle.
//!
//! One [`LmdbStore`] implements every trait in `parcel-store`; the per-trait
//! impls live in their own modules. Serialization is bincode throughout.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::Database;
use serde::de::DeserializeOwned;
use serde::Serialize;

use parcel_store::StoreError;

use crate::environment::LmdbEnvironment;
use crate::error::LmdbError;
use crate::write_batch::WriteBatch;

/// Default LMDB map size: 256 MiB.
pub const DEFAULT_MAP_SIZE: usize = 1 << 28;

/// LMDB-backed implementation of every Parcel store trait.
#[derive(Clone)]
pub struct LmdbStore {
    pub(crate) env: Arc<LmdbEnvironment>,
}

impl LmdbStore {
    /// Open or create the store at `path` with the default map size.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Self::open_with_map_size(path, DEFAULT_MAP_SIZE)
    }

    pub fn open_with_map_size(path: &Path, map_size: usize) -> Result<Self, StoreError> {
        let env = LmdbEnvironment::open(path, map_size).map_err(StoreError::from)?;
        Ok(Self { env: Arc::new(env) })
    }

    /// Begin a write batch that commits multiple collection writes in one
    /// LMDB transaction.
    pub fn write_batch(&self) -> Result<WriteBatch<'_>, StoreError> {
        WriteBatch::new(&self.env)
    }

    // ── Shared single-record helpers ───────────────────────────────────

    pub(crate) fn get_record<T: DeserializeOwned>(
        &self,
        db: Database<Bytes, Bytes>,
        key: &[u8],
        describe: &str,
    ) -> Result<T, StoreError> {
        let rtxn = self.env.env().read_txn().map_err(LmdbError::from)?;
        let bytes = db
            .get(&rtxn, key)
            .map_err(LmdbError::from)?
            .ok_or_else(|| LmdbError::NotFound(describe.to_string()))?;
        bincode::deserialize(bytes)
            .map_err(|e| LmdbError::Serialization(e.to_string()).into())
    }

    pub(crate) fn put_record<T: Serialize>(
        &self,
        db: Database<Bytes, Bytes>,
        key: &[u8],
        value: &T,
    ) -> Result<(), StoreError> {
        let bytes =
            bincode::serialize(value).map_err(|e| LmdbError::Serialization(e.to_string()))?;
        let mut wtxn = self.env.env().write_txn().map_err(LmdbError::from)?;
        db.put(&mut wtxn, key, &bytes).map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    pub(crate) fn delete_record(
        &self,
        db: Database<Bytes, Bytes>,
        key: &[u8],
    ) -> Result<(), StoreError> {
        let mut wtxn = self.env.env().write_txn().map_err(LmdbError::from)?;
        db.delete(&mut wtxn, key).map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    pub(crate) fn exists_record(
        &self,
        db: Database<Bytes, Bytes>,
        key: &[u8],
    ) -> Result<bool, StoreError> {
        let rtxn = self.env.env().read_txn().map_err(LmdbError::from)?;
        Ok(db.get(&rtxn, key).map_err(LmdbError::from)?.is_some())
    }

    pub(crate) fn iter_records<T: DeserializeOwned>(
        &self,
        db: Database<Bytes, Bytes>,
    ) -> Result<Vec<T>, StoreError> {
        let rtxn = self.env.env().read_txn().map_err(LmdbError::from)?;
        let mut records = Vec::new();
        for entry in db.iter(&rtxn).map_err(LmdbError::from)? {
            let (_, bytes) = entry.map_err(LmdbError::from)?;
            records.push(
                bincode::deserialize(bytes)
                    .map_err(|e| LmdbError::Serialization(e.to_string()))?,
            );
        }
        Ok(records)
    }

    pub(crate) fn count_records(&self, db: Database<Bytes, Bytes>) -> Result<u64, StoreError> {
        let rtxn = self.env.env().read_txn().map_err(LmdbError::from)?;
        Ok(db.len(&rtxn).map_err(LmdbError::from)?)
    }
}
