//! Ledger address type with `parc_` prefix.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A Parcel ledger address, always prefixed with `parc_`.
///
/// Derived from the account's public key via Blake2b hashing + hex encoding
/// with a 4-byte checksum suffix.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LedgerAddress(String);

impl LedgerAddress {
    /// The standard prefix for all Parcel ledger addresses.
    pub const PREFIX: &'static str = "parc_";

    /// Create a new ledger address from a raw string.
    ///
    /// # Panics
    /// Panics if the string does not start with `parc_`.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(s.starts_with(Self::PREFIX), "address must start with parc_");
        Self(s)
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate that this address is well-formed.
    pub fn is_valid(&self) -> bool {
        self.0.starts_with(Self::PREFIX) && self.0.len() > Self::PREFIX.len()
    }
}

impl fmt::Display for LedgerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for LedgerAddress {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
