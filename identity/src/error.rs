use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("unknown user: {0}")]
    UnknownUser(String),

    #[error("user already registered: {0}")]
    DuplicateUser(String),

    #[error("{0} already has a pending verification request")]
    PendingKycExists(String),

    #[error("verification request {0} not found")]
    KycNotFound(u64),

    #[error("verification request {0} is not pending")]
    KycNotPending(u64),

    #[error("{user} does not hold the {required} role")]
    RoleMismatch { user: String, required: String },

    #[error("invalid or expired session token")]
    InvalidSession,

    #[error("store error: {0}")]
    Store(#[from] parcel_store::StoreError),
}
