use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("account not found: {0}")]
    AccountNotFound(String),

    #[error("mortgage not found: {0}")]
    MortgageNotFound(u64),

    #[error("ledger transport error: {0}")]
    Transport(String),

    #[error("unexpected ledger response: {0}")]
    BadResponse(String),
}
