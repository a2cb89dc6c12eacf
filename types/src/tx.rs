//! Transaction lifecycle enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The lifecycle status of a submitted transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxStatus {
    /// Accepted at validity-checking; awaiting inclusion.
    Submitted,
    /// Included with result code zero.
    Confirmed,
    /// Rejected at check time, or included with a non-zero result code.
    Failed,
}

impl TxStatus {
    /// Whether this status ends the lifecycle.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Failed)
    }
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Submitted => "submitted",
            Self::Confirmed => "confirmed",
            Self::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// What kind of ledger operation a tracked transaction carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxKind {
    RegisterProperty,
    TransferShares,
    EditPropertyMetadata,
    CreateMortgage,
    RepayMortgage,
    MintMarker,
    TransferMarker,
    BurnMarker,
    SendFunds,
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::RegisterProperty => "register_property",
            Self::TransferShares => "transfer_shares",
            Self::EditPropertyMetadata => "edit_property_metadata",
            Self::CreateMortgage => "create_mortgage",
            Self::RepayMortgage => "repay_mortgage",
            Self::MintMarker => "mint_marker",
            Self::TransferMarker => "transfer_marker",
            Self::BurnMarker => "burn_marker",
            Self::SendFunds => "send_funds",
        };
        write!(f, "{s}")
    }
}
