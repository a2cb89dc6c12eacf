//! User roles and promotion rules.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The role attached to a registered user.
///
/// Roles only ever move "up": a plain `User` becomes an `Investor` through
/// KYC approval, and the privileged roles are assigned at seeding time by
/// an administrator. There is no demotion path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Registered but not yet identity-verified.
    User,
    /// Identity-verified; may purchase off-plan shares.
    Investor,
    /// May submit off-plan properties for crowdfunding.
    Developer,
    /// May approve KYC requests and off-plan property registration.
    Regulator,
    /// Administrative seeding authority.
    Admin,
    /// May create mortgages against requests addressed to it.
    Bank,
}

impl Role {
    /// Whether KYC approval promotes this role.
    ///
    /// Only a plain `User` is promoted (to `Investor`); approval leaves
    /// every other role untouched.
    pub fn promotes_on_kyc(&self) -> bool {
        matches!(self, Self::User)
    }

    /// Whether this role may act as a lender on mortgage requests.
    pub fn can_lend(&self) -> bool {
        matches!(self, Self::Bank)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::User => "user",
            Self::Investor => "investor",
            Self::Developer => "developer",
            Self::Regulator => "regulator",
            Self::Admin => "admin",
            Self::Bank => "bank",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_user_promotes() {
        assert!(Role::User.promotes_on_kyc());
        for role in [
            Role::Investor,
            Role::Developer,
            Role::Regulator,
            Role::Admin,
            Role::Bank,
        ] {
            assert!(!role.promotes_on_kyc(), "{role} should not promote");
        }
    }
}
