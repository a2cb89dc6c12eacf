//! The narrow async interface the gateway consumes.

use async_trait::async_trait;
use parcel_types::{LedgerAddress, TxHash};

use crate::error::LedgerError;
use crate::types::{AccountRecord, MortgageRecord, SubmitOutcome, TxLookup};

/// Everything the gateway may ask of the ledger.
///
/// Implementations: [`crate::HttpLedgerClient`] against a running node,
/// `parcel_nullables::NullLedger` for deterministic tests.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Account number and current sequence for a signer. Fetched at
    /// submission time, never cached, to avoid stale-sequence rejections.
    async fn get_account(&self, address: &LedgerAddress) -> Result<AccountRecord, LedgerError>;

    /// Submit encoded transaction bytes for synchronous validity checking.
    /// A zero result code means mempool acceptance, not finality.
    async fn check_and_submit(&self, tx_bytes: &[u8]) -> Result<SubmitOutcome, LedgerError>;

    /// Look up a transaction by hash. `TxLookup::NotFound` means "not yet
    /// included" and is retryable.
    async fn get_transaction_by_hash(&self, hash: &TxHash) -> Result<TxLookup, LedgerError>;

    /// Read the on-ledger mortgage aggregate.
    async fn get_mortgage(&self, id: u64) -> Result<MortgageRecord, LedgerError>;
}
