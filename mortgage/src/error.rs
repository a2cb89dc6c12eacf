use parcel_types::TxHash;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MortgageError {
    #[error("identity error: {0}")]
    Identity(#[from] parcel_identity::IdentityError),

    #[error("relay error: {0}")]
    Relay(#[from] parcel_relay::RelayError),

    #[error("ledger error: {0}")]
    Ledger(#[from] parcel_ledger::LedgerError),

    #[error("store error: {0}")]
    Store(#[from] parcel_store::StoreError),

    #[error("mortgage request {0} not found")]
    RequestNotFound(u64),

    #[error("mortgage request {0} is not pending")]
    RequestNotPending(u64),

    #[error("{caller} is not the lender on request {request_id}")]
    NotLender { caller: String, request_id: u64 },

    #[error("lender {0} does not hold the bank role")]
    LenderNotBank(String),

    #[error("{caller} is not the lendee on mortgage {mortgage_id}")]
    NotLendee { caller: String, mortgage_id: u64 },

    #[error("mortgage {0} is not open for repayment")]
    NotApproved(u64),

    #[error("repayment {requested} exceeds outstanding amount {outstanding}")]
    ExceedsOutstanding { requested: u128, outstanding: u128 },

    #[error("mortgage creation failed on chain (tx {hash})")]
    CreationFailed { hash: TxHash },

    #[error("repayment failed on chain (tx {hash})")]
    RepaymentFailed { hash: TxHash },
}
