//! Session table — opaque login tokens resolved per call.
//!
//! Replaces a single global "currently logged-in user" slot: any number of
//! sessions can be live at once, and every handler authenticates the token
//! it was given rather than consulting shared state.

use std::sync::Arc;

use rand::RngCore;

use parcel_store::{SessionRecord, SessionStore, User};
use parcel_types::Timestamp;

use crate::error::IdentityError;
use crate::registry::UserRegistry;

/// Length of the random token material in bytes (hex-encoded on the wire).
const TOKEN_LEN: usize = 32;

/// Issues and resolves opaque session tokens.
#[derive(Clone)]
pub struct SessionTable {
    sessions: Arc<dyn SessionStore + Send + Sync>,
    registry: UserRegistry,
}

impl SessionTable {
    pub fn new(sessions: Arc<dyn SessionStore + Send + Sync>, registry: UserRegistry) -> Self {
        Self { sessions, registry }
    }

    /// Log a user in, returning the fresh session token.
    pub fn login(&self, name: &str, now: Timestamp) -> Result<String, IdentityError> {
        self.registry.get(name)?;

        let mut material = [0u8; TOKEN_LEN];
        rand::thread_rng().fill_bytes(&mut material);
        let token = hex::encode(material);

        self.sessions.put_session(&SessionRecord {
            token: token.clone(),
            user: name.to_string(),
            created_at: now,
        })?;
        tracing::info!(name, "session opened");
        Ok(token)
    }

    /// Revoke a session. Unknown tokens are ignored.
    pub fn logout(&self, token: &str) -> Result<(), IdentityError> {
        self.sessions.delete_session(token)?;
        Ok(())
    }

    /// Resolve a token to its user.
    pub fn authenticate(&self, token: &str) -> Result<User, IdentityError> {
        let session = self
            .sessions
            .get_session(token)
            .map_err(|_| IdentityError::InvalidSession)?;
        self.registry.get(&session.user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcel_nullables::NullStore;
    use parcel_types::{LedgerAddress, Role};

    fn table() -> (SessionTable, UserRegistry) {
        let store = Arc::new(NullStore::new());
        let registry = UserRegistry::new(store.clone());
        registry
            .register(
                "alice",
                LedgerAddress::new("parc_alice"),
                Role::User,
                Timestamp::new(1),
            )
            .unwrap();
        (SessionTable::new(store, registry.clone()), registry)
    }

    #[test]
    fn login_then_authenticate() {
        let (table, _) = table();
        let token = table.login("alice", Timestamp::new(2)).unwrap();
        assert_eq!(table.authenticate(&token).unwrap().name, "alice");
    }

    #[test]
    fn logout_invalidates_token() {
        let (table, _) = table();
        let token = table.login("alice", Timestamp::new(2)).unwrap();
        table.logout(&token).unwrap();
        assert!(matches!(
            table.authenticate(&token),
            Err(IdentityError::InvalidSession)
        ));
    }

    #[test]
    fn concurrent_sessions_are_independent() {
        let (table, _) = table();
        let t1 = table.login("alice", Timestamp::new(2)).unwrap();
        let t2 = table.login("alice", Timestamp::new(3)).unwrap();
        assert_ne!(t1, t2);

        table.logout(&t1).unwrap();
        assert!(table.authenticate(&t2).is_ok());
    }

    #[test]
    fn unknown_user_cannot_login() {
        let (table, _) = table();
        assert!(matches!(
            table.login("ghost", Timestamp::new(2)),
            Err(IdentityError::UnknownUser(_))
        ));
    }
}
