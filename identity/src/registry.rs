//! User registry — registration, lookup, and role promotion.

use std::sync::Arc;

use parcel_store::{StoreError, User, UserStore};
use parcel_types::{LedgerAddress, Role, Timestamp};

use crate::error::IdentityError;

/// Registry of gateway users.
///
/// Role transitions are one-directional: privileged roles are assigned at
/// registration (administrative seeding), and the only runtime transition is
/// the KYC-driven `User → Investor` promotion.
#[derive(Clone)]
pub struct UserRegistry {
    users: Arc<dyn UserStore + Send + Sync>,
}

impl UserRegistry {
    pub fn new(users: Arc<dyn UserStore + Send + Sync>) -> Self {
        Self { users }
    }

    /// Register a new user. Rejects duplicate names.
    pub fn register(
        &self,
        name: &str,
        address: LedgerAddress,
        role: Role,
        now: Timestamp,
    ) -> Result<User, IdentityError> {
        if self.users.exists(name)? {
            return Err(IdentityError::DuplicateUser(name.to_string()));
        }
        let user = User {
            name: name.to_string(),
            address,
            role,
            registered_at: now,
        };
        self.users.put_user(&user)?;
        tracing::info!(name, %role, "registered user");
        Ok(user)
    }

    /// Look up a user by name.
    pub fn get(&self, name: &str) -> Result<User, IdentityError> {
        match self.users.get_user(name) {
            Ok(user) => Ok(user),
            Err(StoreError::NotFound(_)) => Err(IdentityError::UnknownUser(name.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    /// Whether a user exists.
    pub fn exists(&self, name: &str) -> Result<bool, IdentityError> {
        Ok(self.users.exists(name)?)
    }

    /// Look up a user and require a specific role.
    pub fn require_role(&self, name: &str, required: Role) -> Result<User, IdentityError> {
        let user = self.get(name)?;
        if user.role != required {
            return Err(IdentityError::RoleMismatch {
                user: name.to_string(),
                required: required.to_string(),
            });
        }
        Ok(user)
    }

    /// Promote a plain `User` to `Investor`. No-op on any other role.
    pub fn promote_on_kyc(&self, name: &str) -> Result<User, IdentityError> {
        let mut user = self.get(name)?;
        if user.role.promotes_on_kyc() {
            user.role = Role::Investor;
            self.users.put_user(&user)?;
            tracing::info!(name, "promoted to investor");
        }
        Ok(user)
    }

    /// All registered users.
    pub fn list(&self) -> Result<Vec<User>, IdentityError> {
        Ok(self.users.iter_users()?)
    }
}
