use parcel_types::TxHash;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("message error: {0}")]
    Msg(#[from] parcel_messages::MsgError),

    #[error("key error: {0}")]
    Key(#[from] parcel_keys::KeyError),

    #[error("ledger error: {0}")]
    Ledger(#[from] parcel_ledger::LedgerError),

    #[error("store error: {0}")]
    Store(#[from] parcel_store::StoreError),

    #[error("transaction rejected at check time (code {code}): {raw_log}")]
    Rejected { code: u32, raw_log: String },

    #[error("confirmation wait timed out for {hash}")]
    ConfirmationTimeout { hash: TxHash },
}
