//! Identity-verification (KYC) workflow.

use std::sync::Arc;

use parcel_store::{KycRequest, KycStatus, KycStore};
use parcel_types::{Role, Timestamp};

use crate::error::IdentityError;
use crate::registry::UserRegistry;

/// Runs the KYC request/approval handshake.
///
/// Invariant: at most one `Pending` request per requester at a time.
/// Approval of a request whose requester still holds the plain `User` role
/// promotes them to `Investor`; any other role is left untouched.
#[derive(Clone)]
pub struct KycEngine {
    kyc: Arc<dyn KycStore + Send + Sync>,
    registry: UserRegistry,
}

impl KycEngine {
    pub fn new(kyc: Arc<dyn KycStore + Send + Sync>, registry: UserRegistry) -> Self {
        Self { kyc, registry }
    }

    /// File a verification request for `user`.
    pub fn request_verification(
        &self,
        user: &str,
        now: Timestamp,
    ) -> Result<KycRequest, IdentityError> {
        self.registry.get(user)?;
        if self.kyc.pending_for(user)?.is_some() {
            return Err(IdentityError::PendingKycExists(user.to_string()));
        }

        let request = KycRequest {
            id: self.kyc.next_kyc_id()?,
            requester: user.to_string(),
            status: KycStatus::Pending,
            created_at: now,
        };
        self.kyc.put_kyc(&request)?;
        tracing::info!(user, id = request.id, "verification requested");
        Ok(request)
    }

    /// Approve a pending request. Role-gated to regulators.
    pub fn approve_verification(
        &self,
        regulator: &str,
        request_id: u64,
    ) -> Result<KycRequest, IdentityError> {
        self.registry.require_role(regulator, Role::Regulator)?;
        let mut request = self.pending_request(request_id)?;

        request.status = KycStatus::Approved;
        self.kyc.put_kyc(&request)?;
        let user = self.registry.promote_on_kyc(&request.requester)?;
        tracing::info!(
            regulator,
            id = request.id,
            requester = %request.requester,
            role = %user.role,
            "verification approved"
        );
        Ok(request)
    }

    /// Reject a pending request. Role-gated to regulators; never touches the
    /// requester's role.
    pub fn reject_verification(
        &self,
        regulator: &str,
        request_id: u64,
    ) -> Result<KycRequest, IdentityError> {
        self.registry.require_role(regulator, Role::Regulator)?;
        let mut request = self.pending_request(request_id)?;

        request.status = KycStatus::Rejected;
        self.kyc.put_kyc(&request)?;
        tracing::info!(regulator, id = request.id, "verification rejected");
        Ok(request)
    }

    /// All verification requests.
    pub fn list(&self) -> Result<Vec<KycRequest>, IdentityError> {
        Ok(self.kyc.iter_kyc()?)
    }

    fn pending_request(&self, id: u64) -> Result<KycRequest, IdentityError> {
        let request = self
            .kyc
            .get_kyc(id)
            .map_err(|_| IdentityError::KycNotFound(id))?;
        if request.status != KycStatus::Pending {
            return Err(IdentityError::KycNotPending(id));
        }
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcel_nullables::NullStore;
    use parcel_types::LedgerAddress;

    struct Fixture {
        engine: KycEngine,
        registry: UserRegistry,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(NullStore::new());
        let registry = UserRegistry::new(store.clone());
        let engine = KycEngine::new(store, registry.clone());

        registry
            .register(
                "alice",
                LedgerAddress::new("parc_alice"),
                Role::User,
                Timestamp::new(1),
            )
            .unwrap();
        registry
            .register(
                "rita",
                LedgerAddress::new("parc_rita"),
                Role::Regulator,
                Timestamp::new(1),
            )
            .unwrap();
        Fixture { engine, registry }
    }

    #[test]
    fn approval_promotes_plain_user() {
        let f = fixture();
        let request = f
            .engine
            .request_verification("alice", Timestamp::new(2))
            .unwrap();
        f.engine.approve_verification("rita", request.id).unwrap();

        assert_eq!(f.registry.get("alice").unwrap().role, Role::Investor);
    }

    #[test]
    fn second_pending_request_rejected() {
        let f = fixture();
        f.engine
            .request_verification("alice", Timestamp::new(2))
            .unwrap();
        assert!(matches!(
            f.engine.request_verification("alice", Timestamp::new(3)),
            Err(IdentityError::PendingKycExists(_))
        ));
    }

    #[test]
    fn new_request_allowed_after_resolution() {
        let f = fixture();
        let first = f
            .engine
            .request_verification("alice", Timestamp::new(2))
            .unwrap();
        f.engine.reject_verification("rita", first.id).unwrap();

        // Rejection resolved the pending slot; a fresh request is fine.
        assert!(f
            .engine
            .request_verification("alice", Timestamp::new(3))
            .is_ok());
        assert_eq!(f.registry.get("alice").unwrap().role, Role::User);
    }

    #[test]
    fn approval_is_regulator_gated() {
        let f = fixture();
        let request = f
            .engine
            .request_verification("alice", Timestamp::new(2))
            .unwrap();
        assert!(matches!(
            f.engine.approve_verification("alice", request.id),
            Err(IdentityError::RoleMismatch { .. })
        ));
    }

    #[test]
    fn approving_non_pending_request_fails() {
        let f = fixture();
        let request = f
            .engine
            .request_verification("alice", Timestamp::new(2))
            .unwrap();
        f.engine.approve_verification("rita", request.id).unwrap();
        assert!(matches!(
            f.engine.approve_verification("rita", request.id),
            Err(IdentityError::KycNotPending(_))
        ));
    }

    #[test]
    fn approval_leaves_investor_role_untouched() {
        let f = fixture();
        let first = f
            .engine
            .request_verification("alice", Timestamp::new(2))
            .unwrap();
        f.engine.approve_verification("rita", first.id).unwrap();

        // A second full cycle must not change the now-Investor role.
        let second = f
            .engine
            .request_verification("alice", Timestamp::new(3))
            .unwrap();
        f.engine.approve_verification("rita", second.id).unwrap();
        assert_eq!(f.registry.get("alice").unwrap().role, Role::Investor);
    }
}
