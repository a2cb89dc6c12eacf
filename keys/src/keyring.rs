//! The keyring capability consumed by the relay and the workflow engines.

use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use parcel_types::{KeyPair, LedgerAddress, Signature};

use crate::address::derive_address;
use crate::error::KeyError;
use crate::keys::{generate_keypair, keypair_from_private};
use crate::keystore::{decrypt_keystore, load_keystore};
use crate::sign::sign_message;

/// A capability that resolves named signing identities to ledger addresses
/// and produces signatures on their behalf.
///
/// The gateway never handles raw private keys outside an implementation of
/// this trait.
pub trait Keyring: Send + Sync {
    /// Resolve the ledger address of a named identity.
    fn address_of(&self, name: &str) -> Result<LedgerAddress, KeyError>;

    /// Sign a message with a named identity's key.
    fn sign(&self, name: &str, message: &[u8]) -> Result<Signature, KeyError>;

    /// Create a fresh key for a new identity, returning its address.
    /// Replaces any existing key under the same name.
    fn generate(&self, name: &str) -> Result<LedgerAddress, KeyError>;
}

/// An in-process keyring holding key pairs by identity name.
///
/// Seeded at startup (deterministic dev seeds or decrypted keystore files)
/// and extended at runtime as users register.
pub struct LocalKeyring {
    keys: RwLock<HashMap<String, KeyPair>>,
}

impl LocalKeyring {
    pub fn new() -> Self {
        Self {
            keys: RwLock::new(HashMap::new()),
        }
    }

    /// Register a key pair under an identity name, replacing any previous one.
    pub fn insert(&self, name: impl Into<String>, pair: KeyPair) {
        self.keys.write().unwrap().insert(name.into(), pair);
    }

    /// Whether an identity is present.
    pub fn contains(&self, name: &str) -> bool {
        self.keys.read().unwrap().contains_key(name)
    }

    /// Names of all registered identities.
    pub fn identities(&self) -> Vec<String> {
        self.keys.read().unwrap().keys().cloned().collect()
    }

    /// Load every `*.json` keystore file in a directory, decrypting each with
    /// the same password. The file stem becomes the identity name.
    pub fn from_keystore_dir(dir: &Path, password: &str) -> Result<Self, KeyError> {
        let ring = Self::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| KeyError::Keystore(format!("bad keystore filename: {path:?}")))?
                .to_string();
            let file = load_keystore(&path)?;
            let secret = decrypt_keystore(&file, password)?;
            ring.insert(name, keypair_from_private(parcel_types::PrivateKey(secret)));
        }
        Ok(ring)
    }
}

impl Default for LocalKeyring {
    fn default() -> Self {
        Self::new()
    }
}

impl Keyring for LocalKeyring {
    fn address_of(&self, name: &str) -> Result<LedgerAddress, KeyError> {
        let keys = self.keys.read().unwrap();
        let pair = keys
            .get(name)
            .ok_or_else(|| KeyError::UnknownIdentity(name.to_string()))?;
        Ok(derive_address(&pair.public))
    }

    fn sign(&self, name: &str, message: &[u8]) -> Result<Signature, KeyError> {
        let keys = self.keys.read().unwrap();
        let pair = keys
            .get(name)
            .ok_or_else(|| KeyError::UnknownIdentity(name.to_string()))?;
        Ok(sign_message(message, &pair.private))
    }

    fn generate(&self, name: &str) -> Result<LedgerAddress, KeyError> {
        let pair = generate_keypair();
        let address = derive_address(&pair.public);
        self.insert(name, pair);
        Ok(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::keypair_from_seed;
    use crate::sign::verify_signature;

    #[test]
    fn sign_through_keyring() {
        let ring = LocalKeyring::new();
        ring.insert("alice", keypair_from_seed(&[1u8; 32]));

        let sig = ring.sign("alice", b"hello").unwrap();
        let public = keypair_from_seed(&[1u8; 32]).public;
        assert!(verify_signature(b"hello", &sig, &public));
    }

    #[test]
    fn unknown_identity_errors() {
        let ring = LocalKeyring::new();
        assert!(matches!(
            ring.address_of("ghost"),
            Err(KeyError::UnknownIdentity(_))
        ));
        assert!(matches!(
            ring.sign("ghost", b"x"),
            Err(KeyError::UnknownIdentity(_))
        ));
    }

    #[test]
    fn address_matches_derivation() {
        let ring = LocalKeyring::new();
        ring.insert("bob", keypair_from_seed(&[2u8; 32]));

        let expected = derive_address(&keypair_from_seed(&[2u8; 32]).public);
        assert_eq!(ring.address_of("bob").unwrap(), expected);
    }

    #[test]
    fn generate_creates_signing_identity() {
        let ring = LocalKeyring::new();
        let address = ring.generate("carol").unwrap();
        assert_eq!(ring.address_of("carol").unwrap(), address);
        assert!(ring.sign("carol", b"x").is_ok());
    }
}
