//! Well-known identity seeding.
//!
//! The gateway needs a handful of identities before it can do anything:
//! the regulator (KYC approvals, off-plan registration, chained purchase
//! transfers), the marker module authority, a bank, an admin, and the
//! faucet. In development they derive from deterministic seeds so every
//! run produces the same addresses; production deployments load them from
//! encrypted keystore files instead.

use parcel_identity::UserRegistry;
use parcel_keys::{keypair_from_seed, blake2b_256_multi, Keyring, LocalKeyring};
use parcel_types::{Role, Timestamp};

use crate::error::GatewayError;

/// Identity name of the regulatory signer.
pub const REGULATOR: &str = "regulator";
/// Identity name of the marker module authority.
pub const MARKER_MODULE: &str = "marker_module";
/// Identity name of the seeded bank.
pub const BANK: &str = "northgate_bank";
/// Identity name of the administrative account.
pub const ADMIN: &str = "admin";
/// Identity name of the faucet account.
pub const FAUCET: &str = "faucet";

/// Domain prefix for development key derivation.
const DEV_SEED_DOMAIN: &[u8] = b"parcel-dev-identity";

const WELL_KNOWN: [(&str, Role); 5] = [
    (ADMIN, Role::Admin),
    (REGULATOR, Role::Regulator),
    (BANK, Role::Bank),
    (MARKER_MODULE, Role::Admin),
    (FAUCET, Role::Admin),
];

/// Deterministic development seed for a named identity.
fn dev_seed(name: &str) -> [u8; 32] {
    blake2b_256_multi(&[DEV_SEED_DOMAIN, name.as_bytes()])
}

/// Ensure every well-known identity has a key and a user record.
///
/// Idempotent: identities already present in the keyring (e.g. loaded from
/// keystore files) or the registry are left untouched.
pub fn seed_well_known(
    keyring: &LocalKeyring,
    registry: &UserRegistry,
    now: Timestamp,
) -> Result<(), GatewayError> {
    for (name, role) in WELL_KNOWN {
        if !keyring.contains(name) {
            keyring.insert(name, keypair_from_seed(&dev_seed(name)));
        }
        if !registry.exists(name)? {
            let address = keyring.address_of(name)?;
            registry.register(name, address, role, now)?;
            tracing::info!(name, %role, "seeded well-known identity");
        }
    }
    Ok(())
}

/// Ensure the simulator's synthetic investors exist.
///
/// Returns the actor names for the workload driver.
pub fn seed_simulator_actors(
    keyring: &LocalKeyring,
    registry: &UserRegistry,
    count: usize,
    now: Timestamp,
) -> Result<Vec<String>, GatewayError> {
    let mut actors = Vec::with_capacity(count);
    for i in 0..count {
        let name = format!("sim{i}");
        if !keyring.contains(&name) {
            keyring.insert(&name, keypair_from_seed(&dev_seed(&name)));
        }
        if !registry.exists(&name)? {
            let address = keyring.address_of(&name)?;
            registry.register(&name, address, Role::Investor, now)?;
        }
        actors.push(name);
    }
    Ok(actors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcel_nullables::NullStore;
    use std::sync::Arc;

    #[test]
    fn seeding_is_idempotent() {
        let store = Arc::new(NullStore::new());
        let registry = UserRegistry::new(store);
        let keyring = LocalKeyring::new();

        seed_well_known(&keyring, &registry, Timestamp::new(1)).unwrap();
        let first = registry.get(REGULATOR).unwrap();

        seed_well_known(&keyring, &registry, Timestamp::new(2)).unwrap();
        let second = registry.get(REGULATOR).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn dev_seeds_are_stable_and_distinct() {
        assert_eq!(dev_seed(REGULATOR), dev_seed(REGULATOR));
        assert_ne!(dev_seed(REGULATOR), dev_seed(BANK));
    }

    #[test]
    fn roles_are_assigned() {
        let store = Arc::new(NullStore::new());
        let registry = UserRegistry::new(store);
        let keyring = LocalKeyring::new();
        seed_well_known(&keyring, &registry, Timestamp::new(1)).unwrap();

        assert_eq!(registry.get(REGULATOR).unwrap().role, Role::Regulator);
        assert_eq!(registry.get(BANK).unwrap().role, Role::Bank);
        assert_eq!(registry.get(ADMIN).unwrap().role, Role::Admin);
    }

    #[test]
    fn simulator_actors_are_investors() {
        let store = Arc::new(NullStore::new());
        let registry = UserRegistry::new(store);
        let keyring = LocalKeyring::new();

        let actors =
            seed_simulator_actors(&keyring, &registry, 3, Timestamp::new(1)).unwrap();
        assert_eq!(actors, vec!["sim0", "sim1", "sim2"]);
        for actor in &actors {
            assert_eq!(registry.get(actor).unwrap().role, Role::Investor);
        }
    }
}
