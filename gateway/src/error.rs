use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("config error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(#[from] parcel_store::StoreError),

    #[error("key error: {0}")]
    Key(#[from] parcel_keys::KeyError),

    #[error("identity error: {0}")]
    Identity(#[from] parcel_identity::IdentityError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
