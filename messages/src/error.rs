use thiserror::Error;

#[derive(Debug, Error)]
pub enum MsgError {
    #[error("invalid message: {0}")]
    Invalid(String),

    #[error("encoding error: {0}")]
    Encoding(String),
}
