//! Off-plan property storage trait.

use crate::StoreError;
use parcel_types::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Funding status of an off-plan property. Strictly monotonic:
/// `ForSale → PendingRegulatorApproval → Registered`, no regression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyStatus {
    /// Accepting purchases until the full value is committed.
    ForSale,
    /// Fully funded; awaiting the regulator's on-chain registration.
    PendingRegulatorApproval,
    /// Registered on the ledger.
    Registered,
}

impl fmt::Display for PropertyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ForSale => "for_sale",
            Self::PendingRegulatorApproval => "pending_regulator_approval",
            Self::Registered => "registered",
        };
        write!(f, "{s}")
    }
}

/// A property offered for off-plan crowdfunding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffPlanProperty {
    pub id: u64,
    /// Identity name of the submitting developer.
    pub developer: String,
    pub address: String,
    pub region: String,
    /// Total value in USD; purchases may never sum past this.
    pub value: u128,
    /// Shares minted at registration.
    pub total_shares: u64,
    pub status: PropertyStatus,
    pub created_at: Timestamp,
}

/// Trait for off-plan property storage operations.
pub trait PropertyStore {
    fn get_property(&self, id: u64) -> Result<OffPlanProperty, StoreError>;
    fn put_property(&self, property: &OffPlanProperty) -> Result<(), StoreError>;
    fn iter_properties(&self) -> Result<Vec<OffPlanProperty>, StoreError>;
    /// Allocate the next property id (monotonic, never reused).
    fn next_property_id(&self) -> Result<u64, StoreError>;
}
