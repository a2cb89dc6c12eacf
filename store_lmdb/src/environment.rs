//! LMDB environment setup.

use std::path::Path;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::error::LmdbError;

/// Number of named LMDB databases.
const MAX_DBS: u32 = 9;
/// Current on-disk schema version, stamped into the meta database on open.
const SCHEMA_VERSION: u32 = 1;
/// Meta key holding the schema version.
const SCHEMA_VERSION_KEY: &[u8] = b"schema_version";

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    env: Env,
    pub(crate) users_db: Database<Bytes, Bytes>,
    pub(crate) sessions_db: Database<Bytes, Bytes>,
    pub(crate) transactions_db: Database<Bytes, Bytes>,
    pub(crate) mortgage_requests_db: Database<Bytes, Bytes>,
    pub(crate) properties_db: Database<Bytes, Bytes>,
    pub(crate) purchases_db: Database<Bytes, Bytes>,
    pub(crate) kyc_db: Database<Bytes, Bytes>,
    pub(crate) listings_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path).map_err(|e| LmdbError::Heed(e.to_string()))?;

        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let users_db = env.create_database(&mut wtxn, Some("users"))?;
        let sessions_db = env.create_database(&mut wtxn, Some("sessions"))?;
        let transactions_db = env.create_database(&mut wtxn, Some("transactions"))?;
        let mortgage_requests_db = env.create_database(&mut wtxn, Some("mortgage_requests"))?;
        let properties_db = env.create_database(&mut wtxn, Some("properties"))?;
        let purchases_db = env.create_database(&mut wtxn, Some("purchases"))?;
        let kyc_db = env.create_database(&mut wtxn, Some("kyc_requests"))?;
        let listings_db = env.create_database(&mut wtxn, Some("listings"))?;
        let meta_db: Database<Bytes, Bytes> = env.create_database(&mut wtxn, Some("meta"))?;

        // Stamp the schema version on first open.
        if meta_db.get(&wtxn, SCHEMA_VERSION_KEY)?.is_none() {
            meta_db.put(&mut wtxn, SCHEMA_VERSION_KEY, &SCHEMA_VERSION.to_le_bytes())?;
        }
        wtxn.commit()?;

        Ok(Self {
            env,
            users_db,
            sessions_db,
            transactions_db,
            mortgage_requests_db,
            properties_db,
            purchases_db,
            kyc_db,
            listings_db,
            meta_db,
        })
    }

    pub(crate) fn env(&self) -> &Env {
        &self.env
    }

    /// The schema version stamped in the meta database.
    pub fn schema_version(&self) -> Result<u32, LmdbError> {
        let rtxn = self.env.read_txn()?;
        match self.meta_db.get(&rtxn, SCHEMA_VERSION_KEY)? {
            Some(bytes) if bytes.len() == 4 => {
                let arr: [u8; 4] = bytes.try_into().expect("checked length");
                Ok(u32::from_le_bytes(arr))
            }
            Some(_) => Err(LmdbError::Serialization(
                "schema_version has unexpected byte length".to_string(),
            )),
            None => Ok(0),
        }
    }

    /// Atomically increment and return a named u64 counter stored in the
    /// meta database. Used for id allocation (monotonic, never reused).
    pub(crate) fn next_counter(&self, name: &str) -> Result<u64, LmdbError> {
        let mut wtxn = self.env.write_txn()?;
        let key = name.as_bytes();
        let current = match self.meta_db.get(&wtxn, key)? {
            Some(bytes) if bytes.len() == 8 => {
                u64::from_le_bytes(bytes.try_into().expect("checked length"))
            }
            _ => 0,
        };
        let next = current + 1;
        self.meta_db.put(&mut wtxn, key, &next.to_le_bytes())?;
        wtxn.commit()?;
        Ok(next)
    }
}
