//! KYC-request storage trait.

use crate::StoreError;
use parcel_types::Timestamp;
use serde::{Deserialize, Serialize};

/// Status of an identity-verification request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KycStatus {
    Pending,
    Approved,
    Rejected,
}

/// An identity-verification request.
///
/// Invariant: at most one `Pending` request per requester at a time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KycRequest {
    pub id: u64,
    /// Identity name of the requesting user.
    pub requester: String,
    pub status: KycStatus,
    pub created_at: Timestamp,
}

/// Trait for KYC-request storage operations.
pub trait KycStore {
    fn get_kyc(&self, id: u64) -> Result<KycRequest, StoreError>;
    fn put_kyc(&self, request: &KycRequest) -> Result<(), StoreError>;
    fn iter_kyc(&self) -> Result<Vec<KycRequest>, StoreError>;
    /// Allocate the next request id (monotonic, never reused).
    fn next_kyc_id(&self) -> Result<u64, StoreError>;

    /// The pending request for a user, if one exists.
    fn pending_for(&self, requester: &str) -> Result<Option<KycRequest>, StoreError> {
        Ok(self
            .iter_kyc()?
            .into_iter()
            .find(|r| r.status == KycStatus::Pending && r.requester == requester))
    }
}
