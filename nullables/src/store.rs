//! Nullable store — thread-safe in-memory storage for testing.
//!
//! One `NullStore` implements every collection trait; iteration preserves
//! insertion order so tests can reason about pagination.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use parcel_store::{
    ForSaleListing, KycRequest, KycStore, ListingStore, MetaStore, MortgageRequest,
    MortgageRequestStore, OffPlanProperty, PropertyStore, PurchaseRequest, PurchaseStore,
    SessionRecord, SessionStore, StoreError, TrackedTransaction, TransactionStore, User, UserStore,
};
use parcel_types::{LedgerAddress, TxHash};

/// Insertion-ordered map keyed by u64 ids.
struct OrderedTable<T> {
    rows: Vec<(u64, T)>,
}

impl<T> Default for OrderedTable<T> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<T: Clone> OrderedTable<T> {
    fn get(&self, id: u64) -> Option<T> {
        self.rows.iter().find(|(k, _)| *k == id).map(|(_, v)| v.clone())
    }

    fn put(&mut self, id: u64, value: T) {
        match self.rows.iter_mut().find(|(k, _)| *k == id) {
            Some((_, v)) => *v = value,
            None => self.rows.push((id, value)),
        }
    }

    fn delete(&mut self, id: u64) {
        self.rows.retain(|(k, _)| *k != id);
    }

    fn values(&self) -> Vec<T> {
        self.rows.iter().map(|(_, v)| v.clone()).collect()
    }
}

/// An in-memory implementation of every Parcel store trait.
/// Thread-safe for use with tokio's multi-threaded runtime.
#[derive(Default)]
pub struct NullStore {
    users: Mutex<Vec<User>>,
    sessions: Mutex<HashMap<String, SessionRecord>>,
    transactions: Mutex<Vec<TrackedTransaction>>,
    mortgage_requests: Mutex<OrderedTable<MortgageRequest>>,
    properties: Mutex<OrderedTable<OffPlanProperty>>,
    purchases: Mutex<OrderedTable<PurchaseRequest>>,
    kyc: Mutex<OrderedTable<KycRequest>>,
    listings: Mutex<OrderedTable<ForSaleListing>>,
    meta: Mutex<HashMap<String, Vec<u8>>>,
    next_mortgage_request: AtomicU64,
    next_property: AtomicU64,
    next_purchase: AtomicU64,
    next_kyc: AtomicU64,
    next_listing: AtomicU64,
}

impl NullStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserStore for NullStore {
    fn get_user(&self, name: &str) -> Result<User, StoreError> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.name == name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    fn put_user(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.name == user.name) {
            Some(existing) => *existing = user.clone(),
            None => users.push(user.clone()),
        }
        Ok(())
    }

    fn exists(&self, name: &str) -> Result<bool, StoreError> {
        Ok(self.users.lock().unwrap().iter().any(|u| u.name == name))
    }

    fn get_by_address(&self, address: &LedgerAddress) -> Result<User, StoreError> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| &u.address == address)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(address.to_string()))
    }

    fn iter_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.users.lock().unwrap().clone())
    }
}

impl SessionStore for NullStore {
    fn get_session(&self, token: &str) -> Result<SessionRecord, StoreError> {
        self.sessions
            .lock()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("session".to_string()))
    }

    fn put_session(&self, session: &SessionRecord) -> Result<(), StoreError> {
        self.sessions
            .lock()
            .unwrap()
            .insert(session.token.clone(), session.clone());
        Ok(())
    }

    fn delete_session(&self, token: &str) -> Result<(), StoreError> {
        self.sessions.lock().unwrap().remove(token);
        Ok(())
    }

    fn iter_sessions(&self) -> Result<Vec<SessionRecord>, StoreError> {
        Ok(self.sessions.lock().unwrap().values().cloned().collect())
    }
}

impl TransactionStore for NullStore {
    fn get_transaction(&self, hash: &TxHash) -> Result<TrackedTransaction, StoreError> {
        self.transactions
            .lock()
            .unwrap()
            .iter()
            .find(|t| &t.hash == hash)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(hash.to_string()))
    }

    fn put_transaction(&self, tx: &TrackedTransaction) -> Result<(), StoreError> {
        let mut transactions = self.transactions.lock().unwrap();
        match transactions.iter_mut().find(|t| t.hash == tx.hash) {
            Some(existing) => *existing = tx.clone(),
            None => transactions.push(tx.clone()),
        }
        Ok(())
    }

    fn exists(&self, hash: &TxHash) -> Result<bool, StoreError> {
        Ok(self
            .transactions
            .lock()
            .unwrap()
            .iter()
            .any(|t| &t.hash == hash))
    }

    fn iter_transactions(&self) -> Result<Vec<TrackedTransaction>, StoreError> {
        Ok(self.transactions.lock().unwrap().clone())
    }

    fn transaction_count(&self) -> Result<u64, StoreError> {
        Ok(self.transactions.lock().unwrap().len() as u64)
    }
}

impl MortgageRequestStore for NullStore {
    fn get_request(&self, id: u64) -> Result<MortgageRequest, StoreError> {
        self.mortgage_requests
            .lock()
            .unwrap()
            .get(id)
            .ok_or_else(|| StoreError::NotFound(format!("mortgage request {id}")))
    }

    fn put_request(&self, request: &MortgageRequest) -> Result<(), StoreError> {
        self.mortgage_requests
            .lock()
            .unwrap()
            .put(request.id, request.clone());
        Ok(())
    }

    fn iter_requests(&self) -> Result<Vec<MortgageRequest>, StoreError> {
        Ok(self.mortgage_requests.lock().unwrap().values())
    }

    fn next_request_id(&self) -> Result<u64, StoreError> {
        Ok(self.next_mortgage_request.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

impl PropertyStore for NullStore {
    fn get_property(&self, id: u64) -> Result<OffPlanProperty, StoreError> {
        self.properties
            .lock()
            .unwrap()
            .get(id)
            .ok_or_else(|| StoreError::NotFound(format!("property {id}")))
    }

    fn put_property(&self, property: &OffPlanProperty) -> Result<(), StoreError> {
        self.properties
            .lock()
            .unwrap()
            .put(property.id, property.clone());
        Ok(())
    }

    fn iter_properties(&self) -> Result<Vec<OffPlanProperty>, StoreError> {
        Ok(self.properties.lock().unwrap().values())
    }

    fn next_property_id(&self) -> Result<u64, StoreError> {
        Ok(self.next_property.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

impl PurchaseStore for NullStore {
    fn get_purchase(&self, id: u64) -> Result<PurchaseRequest, StoreError> {
        self.purchases
            .lock()
            .unwrap()
            .get(id)
            .ok_or_else(|| StoreError::NotFound(format!("purchase {id}")))
    }

    fn put_purchase(&self, purchase: &PurchaseRequest) -> Result<(), StoreError> {
        self.purchases
            .lock()
            .unwrap()
            .put(purchase.id, purchase.clone());
        Ok(())
    }

    fn iter_purchases(&self) -> Result<Vec<PurchaseRequest>, StoreError> {
        Ok(self.purchases.lock().unwrap().values())
    }

    fn next_purchase_id(&self) -> Result<u64, StoreError> {
        Ok(self.next_purchase.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

impl KycStore for NullStore {
    fn get_kyc(&self, id: u64) -> Result<KycRequest, StoreError> {
        self.kyc
            .lock()
            .unwrap()
            .get(id)
            .ok_or_else(|| StoreError::NotFound(format!("kyc request {id}")))
    }

    fn put_kyc(&self, request: &KycRequest) -> Result<(), StoreError> {
        self.kyc.lock().unwrap().put(request.id, request.clone());
        Ok(())
    }

    fn iter_kyc(&self) -> Result<Vec<KycRequest>, StoreError> {
        Ok(self.kyc.lock().unwrap().values())
    }

    fn next_kyc_id(&self) -> Result<u64, StoreError> {
        Ok(self.next_kyc.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

impl ListingStore for NullStore {
    fn get_listing(&self, id: u64) -> Result<ForSaleListing, StoreError> {
        self.listings
            .lock()
            .unwrap()
            .get(id)
            .ok_or_else(|| StoreError::NotFound(format!("listing {id}")))
    }

    fn put_listing(&self, listing: &ForSaleListing) -> Result<(), StoreError> {
        self.listings
            .lock()
            .unwrap()
            .put(listing.id, listing.clone());
        Ok(())
    }

    fn delete_listing(&self, id: u64) -> Result<(), StoreError> {
        self.listings.lock().unwrap().delete(id);
        Ok(())
    }

    fn iter_listings(&self) -> Result<Vec<ForSaleListing>, StoreError> {
        Ok(self.listings.lock().unwrap().values())
    }

    fn next_listing_id(&self) -> Result<u64, StoreError> {
        Ok(self.next_listing.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

impl parcel_store::OffPlanBatchStore for NullStore {
    fn commit_funding(
        &self,
        property: &OffPlanProperty,
        purchase: &PurchaseRequest,
    ) -> Result<(), StoreError> {
        let mut properties = self.properties.lock().unwrap();
        let mut purchases = self.purchases.lock().unwrap();
        properties.put(property.id, property.clone());
        purchases.put(purchase.id, purchase.clone());
        Ok(())
    }
}

impl MetaStore for NullStore {
    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.meta
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn get_meta(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.meta
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("meta key '{key}'")))
    }

    fn delete_meta(&self, key: &str) -> Result<(), StoreError> {
        self.meta.lock().unwrap().remove(key);
        Ok(())
    }
}
