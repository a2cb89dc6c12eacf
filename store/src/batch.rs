//! Multi-collection atomic commits.

use crate::properties::OffPlanProperty;
use crate::purchases::PurchaseRequest;
use crate::StoreError;

/// Commits the off-plan funding transition atomically: the purchase insert
/// and the property status flip either both land or neither does. Backends
/// without multi-collection transactions must still make the pair crash-safe
/// (the in-memory store does both writes under one lock).
pub trait OffPlanBatchStore {
    fn commit_funding(
        &self,
        property: &OffPlanProperty,
        purchase: &PurchaseRequest,
    ) -> Result<(), StoreError>;
}
