//! Argon2id encrypted keystore for Ed25519 private keys.
//!
//! Encrypts a 32-byte Ed25519 secret key with a password:
//! 1. Argon2id derives a 32-byte encryption key from the password + random salt
//! 2. AES-256-GCM encrypts the secret key with a random nonce
//! 3. The result is stored as a JSON file with all parameters for future decryption

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::KeyError;

/// Argon2id parameters: 64 MB memory, 3 iterations, 1 lane of parallelism.
const ARGON2_MEMORY_KIB: u32 = 65536;
const ARGON2_ITERATIONS: u32 = 3;
const ARGON2_PARALLELISM: u32 = 1;
const ARGON2_OUTPUT_LEN: usize = 32;

/// Salt length in bytes.
const SALT_LEN: usize = 32;
/// AES-GCM nonce length in bytes (96 bits).
const NONCE_LEN: usize = 12;

/// The top-level keystore file structure, serializable to/from JSON.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeystoreFile {
    pub version: u32,
    pub crypto: KeystoreCrypto,
}

/// The crypto section of the keystore, containing all encryption parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeystoreCrypto {
    pub cipher: String,
    pub kdf: String,
    pub kdf_params: KdfParams,
    /// Hex-encoded salt.
    pub salt: String,
    /// Hex-encoded nonce.
    pub nonce: String,
    /// Hex-encoded ciphertext.
    pub ciphertext: String,
}

/// KDF parameters for Argon2id.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KdfParams {
    pub memory: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

/// Encrypt a 32-byte Ed25519 secret key with a password using Argon2id + AES-256-GCM.
pub fn encrypt_keystore(secret_key: &[u8; 32], password: &str) -> Result<KeystoreFile, KeyError> {
    let mut rng = rand::thread_rng();

    let mut salt = [0u8; SALT_LEN];
    rng.fill_bytes(&mut salt);

    let mut nonce_bytes = [0u8; NONCE_LEN];
    rng.fill_bytes(&mut nonce_bytes);

    let derived_key = derive_key(password, &salt)?;

    let cipher = Aes256Gcm::new_from_slice(&derived_key)
        .map_err(|e| KeyError::Keystore(format!("AES key init failed: {e}")))?;

    let nonce = Nonce::from_slice(&nonce_bytes);
    let ciphertext = cipher
        .encrypt(nonce, secret_key.as_ref())
        .map_err(|e| KeyError::Keystore(format!("encryption failed: {e}")))?;

    Ok(KeystoreFile {
        version: 1,
        crypto: KeystoreCrypto {
            cipher: "aes-256-gcm".to_string(),
            kdf: "argon2id".to_string(),
            kdf_params: KdfParams {
                memory: ARGON2_MEMORY_KIB,
                iterations: ARGON2_ITERATIONS,
                parallelism: ARGON2_PARALLELISM,
            },
            salt: hex::encode(salt),
            nonce: hex::encode(nonce_bytes),
            ciphertext: hex::encode(&ciphertext),
        },
    })
}

/// Decrypt a keystore file with the given password, returning the 32-byte secret key.
pub fn decrypt_keystore(keystore: &KeystoreFile, password: &str) -> Result<[u8; 32], KeyError> {
    if keystore.version != 1 {
        return Err(KeyError::Keystore(format!(
            "unsupported keystore version: {}",
            keystore.version
        )));
    }

    let salt = hex::decode(&keystore.crypto.salt)
        .map_err(|e| KeyError::Keystore(format!("invalid salt hex: {e}")))?;
    let nonce_bytes = hex::decode(&keystore.crypto.nonce)
        .map_err(|e| KeyError::Keystore(format!("invalid nonce hex: {e}")))?;
    let ciphertext = hex::decode(&keystore.crypto.ciphertext)
        .map_err(|e| KeyError::Keystore(format!("invalid ciphertext hex: {e}")))?;

    if nonce_bytes.len() != NONCE_LEN {
        return Err(KeyError::Keystore(format!(
            "unexpected nonce length: {}",
            nonce_bytes.len()
        )));
    }

    let derived_key = derive_key(password, &salt)?;

    let cipher = Aes256Gcm::new_from_slice(&derived_key)
        .map_err(|e| KeyError::Keystore(format!("AES key init failed: {e}")))?;

    let nonce = Nonce::from_slice(&nonce_bytes);
    let plaintext = cipher
        .decrypt(nonce, ciphertext.as_ref())
        .map_err(|_| KeyError::Keystore("decryption failed (wrong password?)".to_string()))?;

    plaintext
        .as_slice()
        .try_into()
        .map_err(|_| KeyError::Keystore("decrypted key has unexpected length".to_string()))
}

/// Write a keystore file to disk as pretty-printed JSON.
pub fn save_keystore(keystore: &KeystoreFile, path: &Path) -> Result<(), KeyError> {
    let json = serde_json::to_string_pretty(keystore)
        .map_err(|e| KeyError::Keystore(format!("serialization failed: {e}")))?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Read a keystore file from disk.
pub fn load_keystore(path: &Path) -> Result<KeystoreFile, KeyError> {
    let json = std::fs::read_to_string(path)?;
    serde_json::from_str(&json).map_err(|e| KeyError::Keystore(format!("parse failed: {e}")))
}

fn derive_key(password: &str, salt: &[u8]) -> Result<[u8; 32], KeyError> {
    let params = Params::new(
        ARGON2_MEMORY_KIB,
        ARGON2_ITERATIONS,
        ARGON2_PARALLELISM,
        Some(ARGON2_OUTPUT_LEN),
    )
    .map_err(|e| KeyError::Keystore(format!("bad Argon2 params: {e}")))?;

    let argon = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let mut output = [0u8; 32];
    argon
        .hash_password_into(password.as_bytes(), salt, &mut output)
        .map_err(|e| KeyError::Keystore(format!("key derivation failed: {e}")))?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let secret = [42u8; 32];
        let file = encrypt_keystore(&secret, "hunter2").unwrap();
        let recovered = decrypt_keystore(&file, "hunter2").unwrap();
        assert_eq!(recovered, secret);
    }

    #[test]
    fn wrong_password_fails() {
        let file = encrypt_keystore(&[42u8; 32], "hunter2").unwrap();
        assert!(decrypt_keystore(&file, "wrong").is_err());
    }

    #[test]
    fn file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alice.json");

        let file = encrypt_keystore(&[9u8; 32], "pw").unwrap();
        save_keystore(&file, &path).unwrap();
        let loaded = load_keystore(&path).unwrap();
        assert_eq!(decrypt_keystore(&loaded, "pw").unwrap(), [9u8; 32]);
    }

    #[test]
    fn unsupported_version_rejected() {
        let mut file = encrypt_keystore(&[1u8; 32], "pw").unwrap();
        file.version = 2;
        assert!(decrypt_keystore(&file, "pw").is_err());
    }
}
