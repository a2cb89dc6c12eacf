//! Response types for the ledger client interface.

use parcel_types::{ChainEvent, LedgerAddress, TxHash};
use serde::{Deserialize, Serialize};

/// Account state needed to build a signable transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub address: LedgerAddress,
    pub account_number: u64,
    /// Current sequence; must match the next submitted transaction.
    pub sequence: u64,
}

/// Outcome of synchronous validity checking (not finality).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitOutcome {
    pub hash: TxHash,
    /// Zero = accepted into the mempool; non-zero = rejected.
    pub code: u32,
    pub raw_log: String,
}

impl SubmitOutcome {
    pub fn accepted(&self) -> bool {
        self.code == 0
    }
}

/// An included transaction's result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncludedTx {
    /// Zero = executed successfully.
    pub code: u32,
    pub raw_log: String,
    pub events: Vec<ChainEvent>,
    pub height: u64,
}

/// Result of looking a transaction up by hash.
///
/// `NotFound` is the retryable "not yet included" condition; any transport
/// error is terminal for the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TxLookup {
    NotFound,
    Included(IncludedTx),
}

/// Status of the on-ledger mortgage aggregate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MortgageStatus {
    Approved,
    Paid,
}

/// The on-ledger mortgage aggregate (referenced, never owned, by the
/// gateway). `outstanding_amount` strictly decreases via repayments;
/// reaching zero flips the status to `Paid` exactly once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MortgageRecord {
    pub id: u64,
    /// Creation index, part of the collateral marker denom derivation.
    pub index: u64,
    pub lender: LedgerAddress,
    pub lendee: LedgerAddress,
    pub collateral: String,
    pub amount: u128,
    pub outstanding_amount: u128,
    pub status: MortgageStatus,
}
