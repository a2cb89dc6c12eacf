//! Property module messages: registration, share transfer, metadata edits.

use parcel_types::LedgerAddress;
use serde::{Deserialize, Serialize};

/// Register a property on the ledger with its initial share distribution.
///
/// `owners` and `shares` are parallel vectors; the ledger mints
/// `shares[i]` shares to `owners[i]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterProperty {
    /// The registering authority (regulator for off-plan, owner otherwise).
    pub creator: LedgerAddress,
    pub property_id: u64,
    pub address: String,
    pub region: String,
    pub value: u128,
    pub owners: Vec<LedgerAddress>,
    pub shares: Vec<u64>,
}

/// Move shares of a registered property between owners.
///
/// `from_owners[i]` gives up `from_shares[i]` shares; `to_owners[j]`
/// receives `to_shares[j]`. Both sides must sum to the same total.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferShares {
    /// The party authorizing the transfer.
    pub authority: LedgerAddress,
    pub property_id: u64,
    pub from_owners: Vec<LedgerAddress>,
    pub from_shares: Vec<u64>,
    pub to_owners: Vec<LedgerAddress>,
    pub to_shares: Vec<u64>,
}

impl TransferShares {
    /// Total shares moved by this transfer.
    pub fn total(&self) -> u64 {
        self.from_shares.iter().sum()
    }
}

/// Edit a registered property's metadata fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditPropertyMetadata {
    pub owner: LedgerAddress,
    pub property_id: u64,
    pub address: String,
    pub region: String,
}
