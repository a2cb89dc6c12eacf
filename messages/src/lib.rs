//! Ledger message construction for the Parcel gateway.
//!
//! One module per message family, mirroring the ledger's own modules:
//! property registration and share transfers, mortgages, collateral
//! markers, and bank sends. The [`envelope`] module wraps a message in a
//! signable document and carries the finished signature.

pub mod bank;
pub mod envelope;
pub mod error;
pub mod marker;
pub mod mortgage;
pub mod property;
pub mod validation;

pub use bank::SendFunds;
pub use envelope::{SignDoc, SignedTx};
pub use error::MsgError;
pub use marker::{BurnMarker, MintMarker, TransferMarker};
pub use mortgage::{CreateMortgage, RepayMortgage};
pub use property::{EditPropertyMetadata, RegisterProperty, TransferShares};

use parcel_types::TxKind;
use serde::{Deserialize, Serialize};

/// Any message the gateway can submit to the ledger.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum LedgerMsg {
    RegisterProperty(RegisterProperty),
    TransferShares(TransferShares),
    EditPropertyMetadata(EditPropertyMetadata),
    CreateMortgage(CreateMortgage),
    RepayMortgage(RepayMortgage),
    MintMarker(MintMarker),
    TransferMarker(TransferMarker),
    BurnMarker(BurnMarker),
    SendFunds(SendFunds),
}

impl LedgerMsg {
    /// The tracked-transaction kind for this message.
    pub fn kind(&self) -> TxKind {
        match self {
            Self::RegisterProperty(_) => TxKind::RegisterProperty,
            Self::TransferShares(_) => TxKind::TransferShares,
            Self::EditPropertyMetadata(_) => TxKind::EditPropertyMetadata,
            Self::CreateMortgage(_) => TxKind::CreateMortgage,
            Self::RepayMortgage(_) => TxKind::RepayMortgage,
            Self::MintMarker(_) => TxKind::MintMarker,
            Self::TransferMarker(_) => TxKind::TransferMarker,
            Self::BurnMarker(_) => TxKind::BurnMarker,
            Self::SendFunds(_) => TxKind::SendFunds,
        }
    }

    /// Validate the message's own fields (the ledger re-validates on submit).
    pub fn validate(&self) -> Result<(), MsgError> {
        validation::validate(self)
    }
}
