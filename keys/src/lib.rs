//! Signing-key store for the Parcel gateway.
//!
//! Provides Blake2b-256 hashing, Ed25519 key generation and signing, ledger
//! address derivation, the [`Keyring`] capability consumed by the relay, and
//! an encrypted at-rest keystore file format.

pub mod address;
pub mod error;
pub mod hash;
pub mod keyring;
pub mod keys;
pub mod keystore;
pub mod sign;

pub use address::derive_address;
pub use error::KeyError;
pub use hash::{blake2b_256, blake2b_256_multi, hash_message};
pub use keyring::{Keyring, LocalKeyring};
pub use keys::{generate_keypair, keypair_from_private, keypair_from_seed, public_from_private};
pub use sign::{sign_message, verify_signature};
