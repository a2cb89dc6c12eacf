//! Message field validation.
//!
//! Catches malformed messages before signing; the ledger remains the final
//! authority on message semantics.

use crate::error::MsgError;
use crate::LedgerMsg;

pub(crate) fn validate(msg: &LedgerMsg) -> Result<(), MsgError> {
    match msg {
        LedgerMsg::RegisterProperty(m) => {
            if m.address.trim().is_empty() {
                return Err(MsgError::Invalid("property address is empty".into()));
            }
            if m.value == 0 {
                return Err(MsgError::Invalid("property value must be positive".into()));
            }
            if m.owners.is_empty() {
                return Err(MsgError::Invalid("property needs at least one owner".into()));
            }
            if m.owners.len() != m.shares.len() {
                return Err(MsgError::Invalid(format!(
                    "owners/shares length mismatch: {} vs {}",
                    m.owners.len(),
                    m.shares.len()
                )));
            }
            if m.shares.iter().any(|&s| s == 0) {
                return Err(MsgError::Invalid("zero-share owner in registration".into()));
            }
        }
        LedgerMsg::TransferShares(m) => {
            if m.from_owners.len() != m.from_shares.len()
                || m.to_owners.len() != m.to_shares.len()
            {
                return Err(MsgError::Invalid("owners/shares length mismatch".into()));
            }
            if m.from_owners.is_empty() || m.to_owners.is_empty() {
                return Err(MsgError::Invalid("transfer needs both sides".into()));
            }
            let from: u64 = m.from_shares.iter().sum();
            let to: u64 = m.to_shares.iter().sum();
            if from != to {
                return Err(MsgError::Invalid(format!(
                    "unbalanced transfer: {from} given up, {to} received"
                )));
            }
            if from == 0 {
                return Err(MsgError::Invalid("transfer of zero shares".into()));
            }
        }
        LedgerMsg::EditPropertyMetadata(m) => {
            if m.address.trim().is_empty() && m.region.trim().is_empty() {
                return Err(MsgError::Invalid("metadata edit changes nothing".into()));
            }
        }
        LedgerMsg::CreateMortgage(m) => {
            if m.amount == 0 {
                return Err(MsgError::Invalid("mortgage amount must be positive".into()));
            }
            if m.collateral.trim().is_empty() {
                return Err(MsgError::Invalid("mortgage needs collateral".into()));
            }
            if m.term_months == 0 {
                return Err(MsgError::Invalid("mortgage term must be positive".into()));
            }
        }
        LedgerMsg::RepayMortgage(m) => {
            if m.amount == 0 {
                return Err(MsgError::Invalid("repayment must be positive".into()));
            }
        }
        LedgerMsg::MintMarker(m) => {
            if m.denom.trim().is_empty() {
                return Err(MsgError::Invalid("marker denom is empty".into()));
            }
        }
        LedgerMsg::TransferMarker(m) => {
            if m.denom.trim().is_empty() {
                return Err(MsgError::Invalid("marker denom is empty".into()));
            }
        }
        LedgerMsg::BurnMarker(m) => {
            if m.denom.trim().is_empty() {
                return Err(MsgError::Invalid("marker denom is empty".into()));
            }
        }
        LedgerMsg::SendFunds(m) => {
            if m.amount == 0 {
                return Err(MsgError::Invalid("send of zero funds".into()));
            }
            if m.from == m.to {
                return Err(MsgError::Invalid("send to self".into()));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{RegisterProperty, TransferShares};
    use parcel_types::LedgerAddress;

    fn addr(tag: &str) -> LedgerAddress {
        LedgerAddress::new(format!("parc_{tag}"))
    }

    #[test]
    fn balanced_transfer_passes() {
        let msg = LedgerMsg::TransferShares(TransferShares {
            authority: addr("auth"),
            property_id: 1,
            from_owners: vec![addr("a")],
            from_shares: vec![10],
            to_owners: vec![addr("b"), addr("c")],
            to_shares: vec![4, 6],
        });
        assert!(validate(&msg).is_ok());
    }

    #[test]
    fn unbalanced_transfer_rejected() {
        let msg = LedgerMsg::TransferShares(TransferShares {
            authority: addr("auth"),
            property_id: 1,
            from_owners: vec![addr("a")],
            from_shares: vec![10],
            to_owners: vec![addr("b")],
            to_shares: vec![9],
        });
        assert!(validate(&msg).is_err());
    }

    #[test]
    fn registration_length_mismatch_rejected() {
        let msg = LedgerMsg::RegisterProperty(RegisterProperty {
            creator: addr("reg"),
            property_id: 1,
            address: "12 Harbor Way".into(),
            region: "north".into(),
            value: 1000,
            owners: vec![addr("a"), addr("b")],
            shares: vec![100],
        });
        assert!(validate(&msg).is_err());
    }
}
