use parcel_types::TxHash;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PropertyError {
    #[error("identity error: {0}")]
    Identity(#[from] parcel_identity::IdentityError),

    #[error("relay error: {0}")]
    Relay(#[from] parcel_relay::RelayError),

    #[error("store error: {0}")]
    Store(#[from] parcel_store::StoreError),

    #[error("property {0} not found")]
    PropertyNotFound(u64),

    #[error("property {0} is not for sale")]
    NotForSale(u64),

    #[error("purchase of {requested} would overfund property {property_id} ({remaining} remaining)")]
    Overfunded {
        property_id: u64,
        requested: u128,
        remaining: u128,
    },

    #[error("property {0} is not awaiting regulator approval")]
    NotAwaitingApproval(u64),

    #[error("property {0} has no accepted purchases")]
    NoPurchases(u64),

    #[error("invalid property input: {0}")]
    InvalidInput(String),

    #[error("on-chain registration failed (tx {hash})")]
    RegistrationFailed { hash: TxHash },

    #[error("share transfer failed (tx {hash})")]
    TransferFailed { hash: TxHash },

    #[error("metadata edit failed (tx {hash})")]
    EditFailed { hash: TxHash },
}
