//! The signable transaction envelope.
//!
//! A [`SignDoc`] binds a message to the signer's account number and current
//! sequence, so a signature cannot be replayed. The encoded [`SignedTx`] is
//! what the relay submits to the ledger.

use parcel_keys::hash_message;
use parcel_types::{LedgerAddress, Signature, TxHash};
use serde::{Deserialize, Serialize};

use crate::error::MsgError;
use crate::LedgerMsg;

/// The document a signer commits to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignDoc {
    pub account_number: u64,
    pub sequence: u64,
    pub msg: LedgerMsg,
}

impl SignDoc {
    pub fn new(account_number: u64, sequence: u64, msg: LedgerMsg) -> Self {
        Self {
            account_number,
            sequence,
            msg,
        }
    }

    /// Canonical bytes to sign.
    pub fn sign_bytes(&self) -> Result<Vec<u8>, MsgError> {
        bincode::serialize(self).map_err(|e| MsgError::Encoding(e.to_string()))
    }
}

/// A signed transaction ready for submission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignedTx {
    pub doc: SignDoc,
    pub signer: LedgerAddress,
    pub signature: Signature,
}

impl SignedTx {
    /// Encode the full transaction for the wire.
    pub fn encode(&self) -> Result<Vec<u8>, MsgError> {
        bincode::serialize(self).map_err(|e| MsgError::Encoding(e.to_string()))
    }

    /// The transaction hash: Blake2b-256 over the encoded bytes.
    pub fn hash(&self) -> Result<TxHash, MsgError> {
        Ok(hash_message(&self.encode()?))
    }
}
