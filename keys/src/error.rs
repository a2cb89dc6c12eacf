use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("unknown signing identity: {0}")]
    UnknownIdentity(String),

    #[error("keystore error: {0}")]
    Keystore(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
