//! Resale-listing storage trait.

use crate::StoreError;
use parcel_types::{LedgerAddress, Timestamp};
use serde::{Deserialize, Serialize};

/// A resale listing offering some of an owner's shares in a property.
///
/// Listings are bookkeeping only: the shares themselves live on the ledger.
/// When a confirmed transfer moves an owner's shares, their listing must be
/// reduced by the transferred amount and removed at zero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForSaleListing {
    pub id: u64,
    pub property_id: u64,
    pub owner: LedgerAddress,
    /// Shares currently offered.
    pub shares: u64,
    /// Asking price in USD for the whole listing.
    pub price: u128,
    pub created_at: Timestamp,
}

/// Trait for resale-listing storage operations.
pub trait ListingStore {
    fn get_listing(&self, id: u64) -> Result<ForSaleListing, StoreError>;
    fn put_listing(&self, listing: &ForSaleListing) -> Result<(), StoreError>;
    fn delete_listing(&self, id: u64) -> Result<(), StoreError>;
    fn iter_listings(&self) -> Result<Vec<ForSaleListing>, StoreError>;
    /// Allocate the next listing id (monotonic, never reused).
    fn next_listing_id(&self) -> Result<u64, StoreError>;

    /// All listings for one property.
    fn listings_for_property(&self, property_id: u64) -> Result<Vec<ForSaleListing>, StoreError> {
        Ok(self
            .iter_listings()?
            .into_iter()
            .filter(|l| l.property_id == property_id)
            .collect())
    }
}
