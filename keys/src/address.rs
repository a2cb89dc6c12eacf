//! Ledger address derivation from public keys.
//!
//! Address format: `parc_` + hex(account hash, 40 chars) + hex(checksum, 8 chars).
//!
//! Account hash: first 20 bytes of Blake2b-256(public_key).
//! Checksum: first 4 bytes of Blake2b-256(account hash).
//! Total address length: 5 (prefix) + 40 + 8 = 53 characters.

use parcel_types::{LedgerAddress, PublicKey};

use crate::hash::blake2b_256;

/// Length of the account-hash portion in bytes.
const ACCOUNT_HASH_LEN: usize = 20;
/// Length of the checksum portion in bytes.
const CHECKSUM_LEN: usize = 4;

/// Derive the ledger address for a public key.
pub fn derive_address(public_key: &PublicKey) -> LedgerAddress {
    let account_hash = &blake2b_256(&public_key.0)[..ACCOUNT_HASH_LEN];
    let checksum = &blake2b_256(account_hash)[..CHECKSUM_LEN];
    LedgerAddress::new(format!(
        "{}{}{}",
        LedgerAddress::PREFIX,
        hex::encode(account_hash),
        hex::encode(checksum)
    ))
}

/// Check an address's checksum.
///
/// Returns `false` for addresses of the wrong length, with non-hex payloads,
/// or whose checksum does not match the account hash.
pub fn verify_address(address: &LedgerAddress) -> bool {
    let encoded = match address.as_str().strip_prefix(LedgerAddress::PREFIX) {
        Some(rest) => rest,
        None => return false,
    };
    if encoded.len() != (ACCOUNT_HASH_LEN + CHECKSUM_LEN) * 2 {
        return false;
    }
    let bytes = match hex::decode(encoded) {
        Ok(b) => b,
        Err(_) => return false,
    };
    let (account_hash, checksum) = bytes.split_at(ACCOUNT_HASH_LEN);
    blake2b_256(account_hash)[..CHECKSUM_LEN] == *checksum
}
