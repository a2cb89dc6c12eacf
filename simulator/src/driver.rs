//! The background workload driver.
//!
//! Drives the property engines end-to-end through their public operations —
//! the same entry points real traffic uses, so the simulator inherits their
//! concurrency contract and cannot corrupt shared state. Failures are
//! logged and the loop keeps going; a wedged simulator should never take
//! the gateway down with it.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::watch;

use parcel_identity::UserRegistry;
use parcel_property::TransferEngine;
use parcel_types::LedgerAddress;

use crate::partition::{partition, partition_percent};

/// Simulator settings.
#[derive(Clone, Debug)]
pub struct SimulatorConfig {
    /// Pacing delay between synthetic actions.
    pub interval: Duration,
    /// RNG seed; the same seed replays the same traffic.
    pub seed: u64,
    /// Maximum owners for a synthetic registration.
    pub max_owners: usize,
    /// Maximum recipients for a synthetic transfer.
    pub max_recipients: usize,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            seed: 0,
            max_owners: 4,
            max_recipients: 3,
        }
    }
}

/// A property the driver has registered, tracked so later transfers and
/// edits have something to aim at.
struct SimProperty {
    id: u64,
    /// Owner name + current share count, by the driver's own bookkeeping.
    owners: Vec<(String, u64)>,
}

/// Synthesizes registration / transfer / metadata-edit traffic.
pub struct WorkloadDriver {
    transfers: Arc<TransferEngine>,
    registry: UserRegistry,
    /// Identity names the driver acts as; must exist in the registry and
    /// the keyring.
    actors: Vec<String>,
    config: SimulatorConfig,
    rng: StdRng,
    properties: Vec<SimProperty>,
    step_count: u64,
}

impl WorkloadDriver {
    pub fn new(
        transfers: Arc<TransferEngine>,
        registry: UserRegistry,
        actors: Vec<String>,
        config: SimulatorConfig,
    ) -> Self {
        assert!(!actors.is_empty(), "driver needs at least one actor");
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            transfers,
            registry,
            actors,
            config,
            rng,
            properties: Vec::new(),
            step_count: 0,
        }
    }

    /// Run until the shutdown signal flips, pacing one action per interval.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            actors = self.actors.len(),
            interval_ms = self.config.interval.as_millis() as u64,
            seed = self.config.seed,
            "workload simulator started"
        );
        loop {
            tokio::select! {
                _ = shutdown.changed() => break,
                _ = tokio::time::sleep(self.config.interval) => {
                    self.step().await;
                }
            }
        }
        tracing::info!(steps = self.step_count, "workload simulator stopped");
    }

    /// Perform one synthetic action.
    pub async fn step(&mut self) {
        self.step_count += 1;
        let action = if self.properties.is_empty() {
            0
        } else {
            self.rng.gen_range(0..3)
        };
        let result = match action {
            0 => self.register().await,
            1 => self.transfer().await,
            _ => self.edit().await,
        };
        if let Err(e) = result {
            tracing::warn!(step = self.step_count, "simulator action failed: {e}");
        }
    }

    /// Number of actions attempted so far.
    pub fn steps(&self) -> u64 {
        self.step_count
    }

    async fn register(&mut self) -> Result<(), parcel_property::PropertyError> {
        let owner_count = self.rng.gen_range(1..=self.config.max_owners.min(self.actors.len()));
        let splits = partition_percent(&mut self.rng, owner_count);
        let owner_names = self.pick_actors(owner_count);

        let mut owners: Vec<LedgerAddress> = Vec::with_capacity(owner_count);
        for name in &owner_names {
            owners.push(self.registry.get(name)?.address);
        }

        let value = self.rng.gen_range(50u128..=500) * 10_000;
        let street = self.rng.gen_range(1u32..999);
        let (id, _) = self
            .transfers
            .register_property(
                &owner_names[0],
                &format!("{street} Synthetic Way"),
                "simnet",
                value,
                owners,
                splits.clone(),
            )
            .await?;

        self.properties.push(SimProperty {
            id,
            owners: owner_names.into_iter().zip(splits).collect(),
        });
        Ok(())
    }

    async fn transfer(&mut self) -> Result<(), parcel_property::PropertyError> {
        let property_index = self.rng.gen_range(0..self.properties.len());
        let property_id = self.properties[property_index].id;
        let owners = self.properties[property_index].owners.clone();

        let Some(holder_index) = self.pick_holder(&owners) else {
            return Ok(());
        };
        let (seller_name, held) = owners[holder_index].clone();
        let amount = self.rng.gen_range(1..=held);

        let recipient_cap = self.config.max_recipients.min(amount as usize);
        let recipient_count = self.rng.gen_range(1..=recipient_cap);
        let pieces = partition(&mut self.rng, amount, recipient_count);
        let recipient_names = self.pick_actors(recipient_count);

        let seller_address = self.registry.get(&seller_name)?.address;
        let mut to: Vec<(LedgerAddress, u64)> = Vec::with_capacity(recipient_count);
        for (name, piece) in recipient_names.iter().zip(&pieces) {
            to.push((self.registry.get(name)?.address, *piece));
        }

        self.transfers
            .transfer_shares(
                &seller_name,
                property_id,
                vec![(seller_address, amount)],
                to,
            )
            .await?;

        // Mirror the confirmed movement in the driver's own bookkeeping.
        let property = &mut self.properties[property_index];
        property.owners[holder_index].1 -= amount;
        for (name, piece) in recipient_names.into_iter().zip(pieces) {
            match property.owners.iter_mut().find(|(n, _)| *n == name) {
                Some((_, shares)) => *shares += piece,
                None => property.owners.push((name, piece)),
            }
        }
        Ok(())
    }

    async fn edit(&mut self) -> Result<(), parcel_property::PropertyError> {
        let property_index = self.rng.gen_range(0..self.properties.len());
        let property_id = self.properties[property_index].id;
        let owners = self.properties[property_index].owners.clone();
        let Some(holder_index) = self.pick_holder(&owners) else {
            return Ok(());
        };
        let owner = owners[holder_index].0.clone();
        let street = self.rng.gen_range(1u32..999);

        self.transfers
            .edit_metadata(
                &owner,
                property_id,
                &format!("{street} Renumbered Way"),
                "simnet",
            )
            .await?;
        Ok(())
    }

    fn pick_actors(&mut self, count: usize) -> Vec<String> {
        let sampled =
            rand::seq::index::sample(&mut self.rng, self.actors.len(), count.min(self.actors.len()));
        sampled.into_iter().map(|i| self.actors[i].clone()).collect()
    }

    /// Index of a random owner that still holds shares, if any.
    fn pick_holder(&mut self, owners: &[(String, u64)]) -> Option<usize> {
        let holders: Vec<usize> = owners
            .iter()
            .enumerate()
            .filter(|(_, (_, shares))| *shares > 0)
            .map(|(i, _)| i)
            .collect();
        if holders.is_empty() {
            return None;
        }
        Some(holders[self.rng.gen_range(0..holders.len())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcel_keys::{keypair_from_seed, Keyring, LocalKeyring};
    use parcel_nullables::{NullLedger, NullStore};
    use parcel_relay::{Broadcaster, ConfirmationTracker};
    use parcel_types::{Role, Timestamp};

    fn driver(seed: u64) -> WorkloadDriver {
        let ledger = Arc::new(NullLedger::new());
        let store = Arc::new(NullStore::new());

        let ring = LocalKeyring::new();
        let mut actors = Vec::new();
        for i in 0..4u8 {
            let name = format!("sim{i}");
            ring.insert(name.clone(), keypair_from_seed(&[i + 10; 32]));
            actors.push(name);
        }
        let keyring = Arc::new(ring);

        let registry = UserRegistry::new(store.clone());
        for name in &actors {
            registry
                .register(
                    name,
                    keyring.address_of(name).unwrap(),
                    Role::Investor,
                    Timestamp::new(1),
                )
                .unwrap();
        }

        let broadcaster = Arc::new(Broadcaster::new(
            ledger.clone(),
            keyring.clone(),
            store.clone(),
        ));
        let tracker = Arc::new(ConfirmationTracker::with_timing(
            ledger,
            store.clone(),
            Duration::from_millis(2),
            Duration::from_millis(50),
        ));
        let transfers = Arc::new(TransferEngine::new(
            store.clone(),
            store,
            registry.clone(),
            broadcaster,
            tracker,
            keyring,
        ));

        WorkloadDriver::new(
            transfers,
            registry,
            actors,
            SimulatorConfig {
                seed,
                ..SimulatorConfig::default()
            },
        )
    }

    #[tokio::test]
    async fn steps_do_not_panic_and_register_properties() {
        let mut driver = driver(42);
        for _ in 0..20 {
            driver.step().await;
        }
        assert_eq!(driver.steps(), 20);
        assert!(!driver.properties.is_empty());
    }

    #[tokio::test]
    async fn bookkeeping_conserves_shares() {
        let mut driver = driver(7);
        for _ in 0..30 {
            driver.step().await;
        }
        for property in &driver.properties {
            let total: u64 = property.owners.iter().map(|(_, s)| s).sum();
            assert_eq!(total, 100, "property {} shares drifted", property.id);
        }
    }
}
