//! Collateral-marker messages.
//!
//! A marker is a single-unit coin used purely as a collateral-lock flag.
//! Its denom derives deterministically from the collateral and the mortgage
//! index; minting, moving to the module account, and burning it signals
//! release of the collateral.

use parcel_types::LedgerAddress;
use serde::{Deserialize, Serialize};

/// Mint a single marker coin to an account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintMarker {
    /// The module authority performing the mint.
    pub authority: LedgerAddress,
    pub denom: String,
    pub recipient: LedgerAddress,
}

/// Move a marker coin between accounts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferMarker {
    pub from: LedgerAddress,
    pub to: LedgerAddress,
    pub denom: String,
}

/// Burn a marker coin held by the module account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnMarker {
    /// The module authority performing the burn.
    pub authority: LedgerAddress,
    pub denom: String,
}
