//! Fundamental types for the Parcel gateway.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: ledger addresses, transaction hashes, timestamps, key material,
//! and user roles.

pub mod address;
pub mod event;
pub mod hash;
pub mod keys;
pub mod role;
pub mod time;
pub mod tx;

pub use address::LedgerAddress;
pub use event::ChainEvent;
pub use hash::TxHash;
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use role::Role;
pub use time::Timestamp;
pub use tx::{TxKind, TxStatus};
