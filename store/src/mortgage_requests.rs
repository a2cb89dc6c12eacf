//! Mortgage-request storage trait.

use crate::StoreError;
use parcel_types::{LedgerAddress, Timestamp};
use serde::{Deserialize, Serialize};

/// The status of an off-chain mortgage request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Awaiting the lender's approval action.
    Pending,
    /// The lender created the mortgage on the ledger.
    Completed,
}

/// The financial terms of a requested mortgage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MortgageTerms {
    /// Identifier of the collateral asset (property id or deed reference).
    pub collateral: String,
    /// Principal amount.
    pub amount: u128,
    /// Annual interest rate in basis points.
    pub annual_rate_bps: u32,
    /// Term length in months.
    pub term_months: u32,
}

/// Optional property-purchase details carried by a mortgage request.
///
/// When present, mortgage creation chains a share transfer moving the
/// purchased shares to the borrower.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseDetails {
    pub property_id: u64,
    /// Sellers and the share count each gives up.
    pub from_owners: Vec<(LedgerAddress, u64)>,
}

/// An off-chain mortgage request. Created by a borrower, flipped to
/// `Completed` exactly once by the lender's approval; never deleted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MortgageRequest {
    pub id: u64,
    /// Identity name of the borrower who filed the request.
    pub requester: String,
    /// Identity name of the lender the request is addressed to.
    pub lender: String,
    /// The borrower's ledger address (recorded as lendee on-chain).
    pub lendee_address: LedgerAddress,
    pub terms: MortgageTerms,
    pub status: RequestStatus,
    pub purchase: Option<PurchaseDetails>,
    pub created_at: Timestamp,
}

/// Trait for mortgage-request storage operations.
pub trait MortgageRequestStore {
    fn get_request(&self, id: u64) -> Result<MortgageRequest, StoreError>;
    fn put_request(&self, request: &MortgageRequest) -> Result<(), StoreError>;
    fn iter_requests(&self) -> Result<Vec<MortgageRequest>, StoreError>;
    /// Allocate the next request id (monotonic, never reused).
    fn next_request_id(&self) -> Result<u64, StoreError>;

    /// The pending request matching a lender + collateral pair, if any.
    fn find_pending(
        &self,
        lender: &str,
        collateral: &str,
    ) -> Result<Option<MortgageRequest>, StoreError> {
        Ok(self.iter_requests()?.into_iter().find(|r| {
            r.status == RequestStatus::Pending
                && r.lender == lender
                && r.terms.collateral == collateral
        }))
    }
}
