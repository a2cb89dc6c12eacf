//! LMDB storage backend for the Parcel gateway.
//!
//! Implements all storage traits from `parcel-store` using the `heed` LMDB
//! bindings. Each collection maps to one named LMDB database within a single
//! environment; every mutation commits its own write transaction, and the
//! off-plan funding transition goes through [`WriteBatch`] so its two
//! collection writes land atomically.

pub mod environment;
pub mod error;
pub mod kyc;
pub mod listings;
pub mod meta;
pub mod mortgage_requests;
pub mod properties;
pub mod purchases;
pub mod sessions;
pub mod store;
pub mod transactions;
pub mod users;
pub mod write_batch;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use store::LmdbStore;
pub use write_batch::WriteBatch;
