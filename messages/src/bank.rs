//! Bank module messages.

use parcel_types::LedgerAddress;
use serde::{Deserialize, Serialize};

/// Send funds between two ledger accounts (used by the faucet).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendFunds {
    pub from: LedgerAddress,
    pub to: LedgerAddress,
    pub amount: u128,
    pub denom: String,
}
