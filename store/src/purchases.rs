//! Off-plan purchase-request storage trait.

use crate::StoreError;
use parcel_types::Timestamp;
use serde::{Deserialize, Serialize};

/// An accepted off-plan purchase. Immutable once recorded.
///
/// `percent_bps` is the purchase's proportion of the property value in
/// basis points (`amount_usd × 10_000 / value`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRequest {
    pub id: u64,
    pub property_id: u64,
    /// Identity name of the purchasing user.
    pub user: String,
    pub amount_usd: u128,
    pub percent_bps: u32,
    pub created_at: Timestamp,
}

/// Trait for purchase-request storage operations.
pub trait PurchaseStore {
    fn get_purchase(&self, id: u64) -> Result<PurchaseRequest, StoreError>;
    fn put_purchase(&self, purchase: &PurchaseRequest) -> Result<(), StoreError>;
    fn iter_purchases(&self) -> Result<Vec<PurchaseRequest>, StoreError>;
    /// Allocate the next purchase id (monotonic, never reused).
    fn next_purchase_id(&self) -> Result<u64, StoreError>;

    /// All accepted purchases for one property.
    fn purchases_for_property(&self, property_id: u64) -> Result<Vec<PurchaseRequest>, StoreError> {
        Ok(self
            .iter_purchases()?
            .into_iter()
            .filter(|p| p.property_id == property_id)
            .collect())
    }

    /// Total committed USD for one property.
    fn total_for_property(&self, property_id: u64) -> Result<u128, StoreError> {
        Ok(self
            .purchases_for_property(property_id)?
            .iter()
            .map(|p| p.amount_usd)
            .sum())
    }
}
