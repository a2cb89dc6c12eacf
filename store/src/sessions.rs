//! Session storage trait.
//!
//! Sessions are opaque tokens mapped to user names, one record per active
//! login. Handlers authenticate each call by token; there is no ambient
//! "current user".

use crate::StoreError;
use parcel_types::Timestamp;
use serde::{Deserialize, Serialize};

/// An active login session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Opaque random token presented by the client on every call.
    pub token: String,
    /// The user this session authenticates.
    pub user: String,
    pub created_at: Timestamp,
}

/// Trait for session storage operations.
pub trait SessionStore {
    fn get_session(&self, token: &str) -> Result<SessionRecord, StoreError>;
    fn put_session(&self, session: &SessionRecord) -> Result<(), StoreError>;
    fn delete_session(&self, token: &str) -> Result<(), StoreError>;
    fn iter_sessions(&self) -> Result<Vec<SessionRecord>, StoreError>;
}
