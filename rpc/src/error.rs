//! HTTP error mapping.
//!
//! Domain errors converge here and map onto the response taxonomy:
//! validation and role failures are 4xx with a human-readable message,
//! check-time ledger rejections are 422, a confirmation timeout is 504
//! (the transaction may still confirm later), and everything else is 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use parcel_identity::IdentityError;
use parcel_mortgage::MortgageError;
use parcel_property::PropertyError;
use parcel_relay::RelayError;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("unauthenticated")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("ledger rejected the transaction: {0}")]
    LedgerRejected(String),

    #[error("confirmation timed out: {0}")]
    Timeout(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl RpcError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::LedgerRejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {self}");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<IdentityError> for RpcError {
    fn from(e: IdentityError) -> Self {
        match e {
            IdentityError::InvalidSession => Self::Unauthorized,
            IdentityError::RoleMismatch { .. } => Self::Forbidden(e.to_string()),
            IdentityError::UnknownUser(_) | IdentityError::KycNotFound(_) => {
                Self::NotFound(e.to_string())
            }
            IdentityError::DuplicateUser(_)
            | IdentityError::PendingKycExists(_)
            | IdentityError::KycNotPending(_) => Self::Conflict(e.to_string()),
            IdentityError::Store(e) => Self::Internal(e.to_string()),
        }
    }
}

impl From<RelayError> for RpcError {
    fn from(e: RelayError) -> Self {
        match e {
            RelayError::Msg(e) => Self::BadRequest(e.to_string()),
            RelayError::Rejected { .. } => Self::LedgerRejected(e.to_string()),
            RelayError::ConfirmationTimeout { .. } => Self::Timeout(e.to_string()),
            RelayError::Key(_) | RelayError::Ledger(_) | RelayError::Store(_) => {
                Self::Internal(e.to_string())
            }
        }
    }
}

impl From<MortgageError> for RpcError {
    fn from(e: MortgageError) -> Self {
        match e {
            MortgageError::Identity(inner) => inner.into(),
            MortgageError::Relay(inner) => inner.into(),
            MortgageError::RequestNotFound(_) => Self::NotFound(e.to_string()),
            MortgageError::RequestNotPending(_) | MortgageError::NotApproved(_) => {
                Self::Conflict(e.to_string())
            }
            MortgageError::NotLender { .. }
            | MortgageError::NotLendee { .. }
            | MortgageError::LenderNotBank(_) => Self::Forbidden(e.to_string()),
            MortgageError::ExceedsOutstanding { .. } => Self::BadRequest(e.to_string()),
            MortgageError::CreationFailed { .. } | MortgageError::RepaymentFailed { .. } => {
                Self::LedgerRejected(e.to_string())
            }
            MortgageError::Ledger(inner) => match inner {
                parcel_ledger::LedgerError::MortgageNotFound(_) => Self::NotFound(inner.to_string()),
                other => Self::Internal(other.to_string()),
            },
            MortgageError::Store(inner) => Self::Internal(inner.to_string()),
        }
    }
}

impl From<PropertyError> for RpcError {
    fn from(e: PropertyError) -> Self {
        match e {
            PropertyError::Identity(inner) => inner.into(),
            PropertyError::Relay(inner) => inner.into(),
            PropertyError::PropertyNotFound(_) => Self::NotFound(e.to_string()),
            PropertyError::NotForSale(_)
            | PropertyError::NotAwaitingApproval(_)
            | PropertyError::NoPurchases(_) => Self::Conflict(e.to_string()),
            PropertyError::Overfunded { .. } | PropertyError::InvalidInput(_) => {
                Self::BadRequest(e.to_string())
            }
            PropertyError::RegistrationFailed { .. }
            | PropertyError::TransferFailed { .. }
            | PropertyError::EditFailed { .. } => Self::LedgerRejected(e.to_string()),
            PropertyError::Store(inner) => Self::Internal(inner.to_string()),
        }
    }
}

impl From<parcel_store::StoreError> for RpcError {
    fn from(e: parcel_store::StoreError) -> Self {
        match e {
            parcel_store::StoreError::NotFound(key) => Self::NotFound(format!("not found: {key}")),
            other => Self::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_errors_map_to_statuses() {
        assert_eq!(
            RpcError::from(IdentityError::InvalidSession).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            RpcError::from(IdentityError::UnknownUser("x".into())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            RpcError::from(IdentityError::DuplicateUser("x".into())).status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn relay_errors_map_to_statuses() {
        assert_eq!(
            RpcError::from(RelayError::Rejected {
                code: 5,
                raw_log: "bad fee".into()
            })
            .status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            RpcError::from(RelayError::ConfirmationTimeout {
                hash: parcel_types::TxHash::ZERO
            })
            .status(),
            StatusCode::GATEWAY_TIMEOUT
        );
    }
}
