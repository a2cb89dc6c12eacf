//! Direct property operations and share-transfer bookkeeping.
//!
//! Registration, transfers, and metadata edits go straight to the ledger;
//! the off-chain work is the resale-listing reconciliation that follows
//! every confirmed transfer: listings whose owner gave up shares shrink by
//! the transferred amount and disappear at zero.

use std::sync::Arc;

use tokio::sync::Mutex;

use parcel_identity::UserRegistry;
use parcel_keys::Keyring;
use parcel_messages::{EditPropertyMetadata, LedgerMsg, RegisterProperty, TransferShares};
use parcel_relay::{Broadcaster, ConfirmationTracker};
use parcel_store::{ForSaleListing, ListingStore, PropertyStore};
use parcel_types::{LedgerAddress, Timestamp, TxHash, TxStatus};

use crate::error::PropertyError;

/// Drives register/transfer/edit submissions and keeps resale listings
/// consistent with confirmed transfers.
pub struct TransferEngine {
    listings: Arc<dyn ListingStore + Send + Sync>,
    /// Shares the off-plan id counter so direct and off-plan registrations
    /// never collide.
    properties: Arc<dyn PropertyStore + Send + Sync>,
    registry: UserRegistry,
    broadcaster: Arc<Broadcaster>,
    tracker: Arc<ConfirmationTracker>,
    keyring: Arc<dyn parcel_keys::Keyring>,
    /// Serializes listing reconciliation.
    mutation: Mutex<()>,
}

impl TransferEngine {
    pub fn new(
        listings: Arc<dyn ListingStore + Send + Sync>,
        properties: Arc<dyn PropertyStore + Send + Sync>,
        registry: UserRegistry,
        broadcaster: Arc<Broadcaster>,
        tracker: Arc<ConfirmationTracker>,
        keyring: Arc<dyn parcel_keys::Keyring>,
    ) -> Self {
        Self {
            listings,
            properties,
            registry,
            broadcaster,
            tracker,
            keyring,
            mutation: Mutex::new(()),
        }
    }

    /// Register a property directly on the ledger with an explicit share
    /// distribution. Returns the assigned property id and the confirmed
    /// transaction hash.
    pub async fn register_property(
        &self,
        owner: &str,
        address: &str,
        region: &str,
        value: u128,
        owners: Vec<LedgerAddress>,
        shares: Vec<u64>,
    ) -> Result<(u64, TxHash), PropertyError> {
        self.registry.get(owner)?;
        let creator = self
            .keyring
            .address_of(owner)
            .map_err(parcel_relay::RelayError::from)?;
        let property_id = self.properties.next_property_id()?;

        let msg = LedgerMsg::RegisterProperty(RegisterProperty {
            creator,
            property_id,
            address: address.to_string(),
            region: region.to_string(),
            value,
            owners,
            shares,
        });
        let hash = self.broadcaster.submit(owner, msg).await?;
        let status = self.tracker.await_confirmation(hash).await?;
        if status != TxStatus::Confirmed {
            return Err(PropertyError::RegistrationFailed { hash });
        }
        tracing::info!(owner, property_id, %hash, "property registered");
        Ok((property_id, hash))
    }

    /// Transfer shares between owners and reconcile resale listings once
    /// the transfer confirms.
    pub async fn transfer_shares(
        &self,
        authority: &str,
        property_id: u64,
        from: Vec<(LedgerAddress, u64)>,
        to: Vec<(LedgerAddress, u64)>,
    ) -> Result<TxHash, PropertyError> {
        self.registry.get(authority)?;
        let authority_address = self
            .keyring
            .address_of(authority)
            .map_err(parcel_relay::RelayError::from)?;

        let msg = LedgerMsg::TransferShares(TransferShares {
            authority: authority_address,
            property_id,
            from_owners: from.iter().map(|(a, _)| a.clone()).collect(),
            from_shares: from.iter().map(|(_, s)| *s).collect(),
            to_owners: to.iter().map(|(a, _)| a.clone()).collect(),
            to_shares: to.iter().map(|(_, s)| *s).collect(),
        });
        let hash = self.broadcaster.submit(authority, msg).await?;
        let status = self.tracker.await_confirmation(hash).await?;
        if status != TxStatus::Confirmed {
            return Err(PropertyError::TransferFailed { hash });
        }

        self.reconcile_listings(property_id, &from).await?;
        tracing::info!(authority, property_id, %hash, "shares transferred");
        Ok(hash)
    }

    /// Edit a registered property's metadata on the ledger.
    pub async fn edit_metadata(
        &self,
        owner: &str,
        property_id: u64,
        address: &str,
        region: &str,
    ) -> Result<TxHash, PropertyError> {
        self.registry.get(owner)?;
        let owner_address = self
            .keyring
            .address_of(owner)
            .map_err(parcel_relay::RelayError::from)?;

        let msg = LedgerMsg::EditPropertyMetadata(EditPropertyMetadata {
            owner: owner_address,
            property_id,
            address: address.to_string(),
            region: region.to_string(),
        });
        let hash = self.broadcaster.submit(owner, msg).await?;
        let status = self.tracker.await_confirmation(hash).await?;
        if status != TxStatus::Confirmed {
            return Err(PropertyError::EditFailed { hash });
        }
        tracing::info!(owner, property_id, %hash, "metadata edited");
        Ok(hash)
    }

    /// Offer some of an owner's shares for resale.
    pub fn create_listing(
        &self,
        owner: &str,
        property_id: u64,
        shares: u64,
        price: u128,
        now: Timestamp,
    ) -> Result<ForSaleListing, PropertyError> {
        let owner_user = self.registry.get(owner)?;
        if shares == 0 {
            return Err(PropertyError::InvalidInput("listing of zero shares".into()));
        }

        let listing = ForSaleListing {
            id: self.listings.next_listing_id()?,
            property_id,
            owner: owner_user.address,
            shares,
            price,
            created_at: now,
        };
        self.listings.put_listing(&listing)?;
        Ok(listing)
    }

    /// All live listings.
    pub fn list_listings(&self) -> Result<Vec<ForSaleListing>, PropertyError> {
        Ok(self.listings.iter_listings()?)
    }

    /// Reduce each from-owner's listing by the shares they gave up; drop
    /// listings that reach zero.
    async fn reconcile_listings(
        &self,
        property_id: u64,
        from: &[(LedgerAddress, u64)],
    ) -> Result<(), PropertyError> {
        let _guard = self.mutation.lock().await;
        for listing in self.listings.listings_for_property(property_id)? {
            let Some((_, moved)) = from.iter().find(|(owner, _)| owner == &listing.owner) else {
                continue;
            };
            let remaining = listing.shares.saturating_sub(*moved);
            if remaining == 0 {
                self.listings.delete_listing(listing.id)?;
                tracing::info!(listing = listing.id, property_id, "listing exhausted by transfer");
            } else {
                let mut updated = listing.clone();
                updated.shares = remaining;
                self.listings.put_listing(&updated)?;
                tracing::debug!(
                    listing = listing.id,
                    property_id,
                    remaining,
                    "listing reduced by transfer"
                );
            }
        }
        Ok(())
    }
}
