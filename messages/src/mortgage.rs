//! Mortgage module messages.

use parcel_types::LedgerAddress;
use serde::{Deserialize, Serialize};

/// Create a mortgage funded by the lender.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateMortgage {
    pub lender: LedgerAddress,
    pub lendee: LedgerAddress,
    /// Identifier of the collateral asset locked against the loan.
    pub collateral: String,
    pub amount: u128,
    pub annual_rate_bps: u32,
    pub term_months: u32,
}

/// Repay part (or all) of a mortgage's outstanding amount.
///
/// The ledger moves `amount` from the lendee to the lender and decrements
/// the outstanding balance; the gateway chains the collateral-marker release
/// when the balance reaches zero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepayMortgage {
    pub lendee: LedgerAddress,
    pub mortgage_id: u64,
    pub amount: u128,
}
