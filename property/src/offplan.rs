//! Off-plan crowdfunding engine.
//!
//! State machine on [`PropertyStatus`]:
//!
//! ```text
//! ForSale --(Σ purchases == value)--> PendingRegulatorApproval
//!          --(regulator approves)---> Registered
//! ```
//!
//! Funding is strict: a purchase that would push the committed total past
//! the property value is rejected, and the transition to
//! `PendingRegulatorApproval` fires exactly when the total equals the value.
//! Partial funding leaves the property `ForSale` indefinitely.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use parcel_identity::UserRegistry;
use parcel_messages::{LedgerMsg, RegisterProperty};
use parcel_relay::{Broadcaster, ConfirmationTracker};
use parcel_store::{
    OffPlanBatchStore, OffPlanProperty, PropertyStatus, PropertyStore, PurchaseRequest,
    PurchaseStore,
};
use parcel_types::{LedgerAddress, Role, Timestamp, TxHash, TxStatus};

use crate::allocation::{allocate_shares, percent_bps};
use crate::error::PropertyError;

/// Outcome of a purchase submission.
#[derive(Clone, Debug)]
pub struct PurchaseOutcome {
    pub purchase: PurchaseRequest,
    /// Set when this purchase completed the funding and the property moved
    /// to `PendingRegulatorApproval`.
    pub fully_funded: bool,
}

/// Drives the off-plan submit/purchase/approve workflow.
pub struct OffPlanEngine {
    properties: Arc<dyn PropertyStore + Send + Sync>,
    purchases: Arc<dyn PurchaseStore + Send + Sync>,
    batch: Arc<dyn OffPlanBatchStore + Send + Sync>,
    registry: UserRegistry,
    broadcaster: Arc<Broadcaster>,
    tracker: Arc<ConfirmationTracker>,
    /// Serializes the funding check-then-write span.
    mutation: Mutex<()>,
}

impl OffPlanEngine {
    pub fn new(
        properties: Arc<dyn PropertyStore + Send + Sync>,
        purchases: Arc<dyn PurchaseStore + Send + Sync>,
        batch: Arc<dyn OffPlanBatchStore + Send + Sync>,
        registry: UserRegistry,
        broadcaster: Arc<Broadcaster>,
        tracker: Arc<ConfirmationTracker>,
    ) -> Self {
        Self {
            properties,
            purchases,
            batch,
            registry,
            broadcaster,
            tracker,
            mutation: Mutex::new(()),
        }
    }

    /// Submit a property for crowdfunding. Role-gated to developers.
    pub fn submit_property(
        &self,
        developer: &str,
        address: &str,
        region: &str,
        value: u128,
        total_shares: u64,
        now: Timestamp,
    ) -> Result<OffPlanProperty, PropertyError> {
        self.registry.require_role(developer, Role::Developer)?;
        if value == 0 || total_shares == 0 {
            return Err(PropertyError::InvalidInput(
                "value and total shares must be positive".into(),
            ));
        }
        if address.trim().is_empty() {
            return Err(PropertyError::InvalidInput("address is empty".into()));
        }

        let property = OffPlanProperty {
            id: self.properties.next_property_id()?,
            developer: developer.to_string(),
            address: address.to_string(),
            region: region.to_string(),
            value,
            total_shares,
            status: PropertyStatus::ForSale,
            created_at: now,
        };
        self.properties.put_property(&property)?;
        tracing::info!(developer, id = property.id, value, "off-plan property submitted");
        Ok(property)
    }

    /// Record an investor's purchase. Always `accepted` once recorded; the
    /// no-overfunding invariant (`Σ amounts ≤ value`) is enforced here.
    pub async fn submit_purchase(
        &self,
        user: &str,
        property_id: u64,
        amount_usd: u128,
        now: Timestamp,
    ) -> Result<PurchaseOutcome, PropertyError> {
        self.registry.require_role(user, Role::Investor)?;
        if amount_usd == 0 {
            return Err(PropertyError::InvalidInput("amount must be positive".into()));
        }

        let _guard = self.mutation.lock().await;
        let mut property = self.property(property_id)?;
        if property.status != PropertyStatus::ForSale {
            return Err(PropertyError::NotForSale(property_id));
        }

        let committed = self.purchases.total_for_property(property_id)?;
        let remaining = property.value - committed;
        if amount_usd > remaining {
            return Err(PropertyError::Overfunded {
                property_id,
                requested: amount_usd,
                remaining,
            });
        }

        let purchase = PurchaseRequest {
            id: self.purchases.next_purchase_id()?,
            property_id,
            user: user.to_string(),
            amount_usd,
            percent_bps: percent_bps(amount_usd, property.value),
            created_at: now,
        };

        let fully_funded = committed + amount_usd == property.value;
        if fully_funded {
            property.status = PropertyStatus::PendingRegulatorApproval;
            // One batch: the status flip and the completing purchase must
            // not be separable by a crash.
            self.batch.commit_funding(&property, &purchase)?;
            tracing::info!(id = property_id, "off-plan property fully funded");
        } else {
            self.purchases.put_purchase(&purchase)?;
        }

        tracing::debug!(
            user,
            id = property_id,
            amount_usd,
            percent_bps = purchase.percent_bps,
            "purchase accepted"
        );
        Ok(PurchaseOutcome {
            purchase,
            fully_funded,
        })
    }

    /// Register a fully funded property on the ledger. Role-gated to the
    /// regulator, who signs the registration.
    ///
    /// Purchases aggregate into `(owner, share)` pairs via the allocation
    /// policy; on confirmed registration the property becomes `Registered`.
    pub async fn approve_property(
        &self,
        regulator: &str,
        property_id: u64,
    ) -> Result<TxHash, PropertyError> {
        let regulator_user = self.registry.require_role(regulator, Role::Regulator)?;

        let mut property = self.property(property_id)?;
        if property.status != PropertyStatus::PendingRegulatorApproval {
            return Err(PropertyError::NotAwaitingApproval(property_id));
        }

        let purchases = self.purchases.purchases_for_property(property_id)?;
        if purchases.is_empty() {
            return Err(PropertyError::NoPurchases(property_id));
        }

        // Aggregate per purchaser address (a user may have bought twice).
        let mut holdings: BTreeMap<LedgerAddress, u32> = BTreeMap::new();
        for purchase in &purchases {
            let address = self.registry.get(&purchase.user)?.address;
            *holdings.entry(address).or_insert(0) += purchase.percent_bps;
        }
        let holdings: Vec<(LedgerAddress, u32)> = holdings.into_iter().collect();
        let allocated = allocate_shares(property.total_shares, &holdings);

        let msg = LedgerMsg::RegisterProperty(RegisterProperty {
            creator: regulator_user.address,
            property_id,
            address: property.address.clone(),
            region: property.region.clone(),
            value: property.value,
            owners: allocated.iter().map(|(o, _)| o.clone()).collect(),
            shares: allocated.iter().map(|(_, s)| *s).collect(),
        });
        let hash = self.broadcaster.submit(regulator, msg).await?;
        let status = self.tracker.await_confirmation(hash).await?;
        if status != TxStatus::Confirmed {
            return Err(PropertyError::RegistrationFailed { hash });
        }

        let _guard = self.mutation.lock().await;
        property.status = PropertyStatus::Registered;
        self.properties.put_property(&property)?;
        tracing::info!(regulator, id = property_id, %hash, "off-plan property registered");
        Ok(hash)
    }

    /// All off-plan properties.
    pub fn list_properties(&self) -> Result<Vec<OffPlanProperty>, PropertyError> {
        Ok(self.properties.iter_properties()?)
    }

    /// Accepted purchases for a property.
    pub fn list_purchases(&self, property_id: u64) -> Result<Vec<PurchaseRequest>, PropertyError> {
        Ok(self.purchases.purchases_for_property(property_id)?)
    }

    fn property(&self, id: u64) -> Result<OffPlanProperty, PropertyError> {
        self.properties
            .get_property(id)
            .map_err(|_| PropertyError::PropertyNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcel_keys::{keypair_from_seed, Keyring, LocalKeyring};
    use parcel_nullables::{NullLedger, NullStore};
    use std::time::Duration;

    struct Fixture {
        engine: OffPlanEngine,
        ledger: Arc<NullLedger>,
        keyring: Arc<LocalKeyring>,
    }

    fn fixture() -> Fixture {
        let ledger = Arc::new(NullLedger::new());
        let store = Arc::new(NullStore::new());

        let ring = LocalKeyring::new();
        for (name, seed) in [
            ("devon", 1u8),
            ("rita", 2),
            ("ivan", 3),
            ("ingrid", 4),
        ] {
            ring.insert(name, keypair_from_seed(&[seed; 32]));
        }
        let keyring = Arc::new(ring);

        let registry = UserRegistry::new(store.clone());
        for (name, role) in [
            ("devon", Role::Developer),
            ("rita", Role::Regulator),
            ("ivan", Role::Investor),
            ("ingrid", Role::Investor),
        ] {
            registry
                .register(
                    name,
                    keyring.address_of(name).unwrap(),
                    role,
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
            ledger.clone(),
            store.clone(),
            Duration::from_millis(5),
            Duration::from_millis(100),
        ));

        let engine = OffPlanEngine::new(
            store.clone(),
            store.clone(),
            store.clone(),
            registry,
            broadcaster,
            tracker,
        );
        Fixture {
            engine,
            ledger,
            keyring,
        }
    }

    fn submit(f: &Fixture) -> u64 {
        f.engine
            .submit_property("devon", "12 Harbor Way", "north", 1_000_000, 1000, Timestamp::new(2))
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn submission_is_developer_gated() {
        let f = fixture();
        let err = f
            .engine
            .submit_property("ivan", "12 Harbor Way", "north", 1_000_000, 1000, Timestamp::new(2))
            .unwrap_err();
        assert!(matches!(err, PropertyError::Identity(_)));
    }

    #[tokio::test]
    async fn purchase_is_investor_gated() {
        let f = fixture();
        let id = submit(&f);
        let err = f
            .engine
            .submit_purchase("devon", id, 100, Timestamp::new(3))
            .await
            .unwrap_err();
        assert!(matches!(err, PropertyError::Identity(_)));
    }

    #[tokio::test]
    async fn exact_funding_transitions_and_approval_allocates() {
        let f = fixture();
        let id = submit(&f);

        let first = f
            .engine
            .submit_purchase("ivan", id, 600_000, Timestamp::new(3))
            .await
            .unwrap();
        assert!(!first.fully_funded);
        assert_eq!(first.purchase.percent_bps, 6000);

        let second = f
            .engine
            .submit_purchase("ingrid", id, 400_000, Timestamp::new(4))
            .await
            .unwrap();
        assert!(second.fully_funded);
        assert_eq!(second.purchase.percent_bps, 4000);

        let property = f.engine.list_properties().unwrap().remove(0);
        assert_eq!(property.status, PropertyStatus::PendingRegulatorApproval);

        f.engine.approve_property("rita", id).await.unwrap();
        let property = f.engine.list_properties().unwrap().remove(0);
        assert_eq!(property.status, PropertyStatus::Registered);

        let registration = f
            .ledger
            .submissions()
            .into_iter()
            .find_map(|tx| match tx.doc.msg {
                LedgerMsg::RegisterProperty(r) => Some(r),
                _ => None,
            })
            .expect("registration submitted");
        let ivan = f.keyring.address_of("ivan").unwrap();
        let ingrid = f.keyring.address_of("ingrid").unwrap();
        let mut pairs: Vec<(LedgerAddress, u64)> = registration
            .owners
            .into_iter()
            .zip(registration.shares)
            .collect();
        pairs.sort_by(|a, b| b.1.cmp(&a.1));
        assert_eq!(pairs, vec![(ivan, 600), (ingrid, 400)]);
    }

    #[tokio::test]
    async fn overfunding_is_rejected() {
        let f = fixture();
        let id = submit(&f);
        f.engine
            .submit_purchase("ivan", id, 600_000, Timestamp::new(3))
            .await
            .unwrap();

        let err = f
            .engine
            .submit_purchase("ingrid", id, 400_001, Timestamp::new(4))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PropertyError::Overfunded {
                remaining: 400_000,
                ..
            }
        ));

        // Partial funding leaves the property for sale.
        let property = f.engine.list_properties().unwrap().remove(0);
        assert_eq!(property.status, PropertyStatus::ForSale);
    }

    #[tokio::test]
    async fn purchases_rejected_once_fully_funded() {
        let f = fixture();
        let id = submit(&f);
        f.engine
            .submit_purchase("ivan", id, 1_000_000, Timestamp::new(3))
            .await
            .unwrap();

        let err = f
            .engine
            .submit_purchase("ingrid", id, 1, Timestamp::new(4))
            .await
            .unwrap_err();
        assert!(matches!(err, PropertyError::NotForSale(_)));
    }

    #[tokio::test]
    async fn approval_requires_full_funding() {
        let f = fixture();
        let id = submit(&f);
        f.engine
            .submit_purchase("ivan", id, 600_000, Timestamp::new(3))
            .await
            .unwrap();

        let err = f.engine.approve_property("rita", id).await.unwrap_err();
        assert!(matches!(err, PropertyError::NotAwaitingApproval(_)));
    }

    #[tokio::test]
    async fn repeat_purchases_by_one_user_aggregate() {
        let f = fixture();
        let id = submit(&f);
        f.engine
            .submit_purchase("ivan", id, 500_000, Timestamp::new(3))
            .await
            .unwrap();
        f.engine
            .submit_purchase("ivan", id, 500_000, Timestamp::new(4))
            .await
            .unwrap();

        f.engine.approve_property("rita", id).await.unwrap();

        let registration = f
            .ledger
            .submissions()
            .into_iter()
            .find_map(|tx| match tx.doc.msg {
                LedgerMsg::RegisterProperty(r) => Some(r),
                _ => None,
            })
            .unwrap();
        assert_eq!(registration.owners.len(), 1);
        assert_eq!(registration.shares, vec![1000]);
    }

    #[tokio::test]
    async fn funding_sum_never_exceeds_value() {
        let f = fixture();
        let id = submit(&f);

        for (user, amount) in [("ivan", 300_000u128), ("ingrid", 300_000), ("ivan", 399_999)] {
            f.engine
                .submit_purchase(user, id, amount, Timestamp::new(5))
                .await
                .unwrap();
        }
        // 999_999 committed; 2 overfunds, 1 completes.
        assert!(f
            .engine
            .submit_purchase("ingrid", id, 2, Timestamp::new(6))
            .await
            .is_err());
        let outcome = f
            .engine
            .submit_purchase("ingrid", id, 1, Timestamp::new(7))
            .await
            .unwrap();
        assert!(outcome.fully_funded);
    }
}
