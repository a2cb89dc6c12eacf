//! Mortgage workflow handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use parcel_store::{MortgageRequest, MortgageTerms, PurchaseDetails, RequestStatus};
use parcel_types::{LedgerAddress, Timestamp};

use crate::error::RpcError;
use crate::state::RpcState;

#[derive(Debug, Deserialize)]
pub struct OwnerShare {
    pub address: String,
    pub shares: u64,
}

#[derive(Debug, Deserialize)]
pub struct PurchaseDetailsRequest {
    pub property_id: u64,
    pub from_owners: Vec<OwnerShare>,
}

#[derive(Debug, Deserialize)]
pub struct MortgageRequestBody {
    pub lender: String,
    pub collateral: String,
    pub amount: u128,
    pub annual_rate_bps: u32,
    pub term_months: u32,
    pub purchase: Option<PurchaseDetailsRequest>,
}

#[derive(Debug, Serialize)]
pub struct MortgageRequestView {
    pub id: u64,
    pub requester: String,
    pub lender: String,
    pub collateral: String,
    pub amount: u128,
    pub annual_rate_bps: u32,
    pub term_months: u32,
    pub status: String,
}

impl From<MortgageRequest> for MortgageRequestView {
    fn from(request: MortgageRequest) -> Self {
        Self {
            id: request.id,
            requester: request.requester,
            lender: request.lender,
            collateral: request.terms.collateral,
            amount: request.terms.amount,
            annual_rate_bps: request.terms.annual_rate_bps,
            term_months: request.terms.term_months,
            status: match request.status {
                RequestStatus::Pending => "pending".to_string(),
                RequestStatus::Completed => "completed".to_string(),
            },
        }
    }
}

fn parse_address(raw: &str) -> Result<LedgerAddress, RpcError> {
    if !raw.starts_with(LedgerAddress::PREFIX) {
        return Err(RpcError::BadRequest(format!("malformed address: {raw}")));
    }
    Ok(LedgerAddress::new(raw))
}

/// File a mortgage request; the authenticated user is the borrower.
pub async fn request_mortgage(
    State(state): State<Arc<RpcState>>,
    headers: HeaderMap,
    Json(body): Json<MortgageRequestBody>,
) -> Result<Json<MortgageRequestView>, RpcError> {
    let borrower = state.authenticate(&headers)?;

    let purchase = match body.purchase {
        Some(details) => {
            let mut from_owners = Vec::with_capacity(details.from_owners.len());
            for owner in details.from_owners {
                from_owners.push((parse_address(&owner.address)?, owner.shares));
            }
            Some(PurchaseDetails {
                property_id: details.property_id,
                from_owners,
            })
        }
        None => None,
    };

    let request = state
        .mortgages
        .request_mortgage(
            &borrower.name,
            &body.lender,
            MortgageTerms {
                collateral: body.collateral,
                amount: body.amount,
                annual_rate_bps: body.annual_rate_bps,
                term_months: body.term_months,
            },
            purchase,
            Timestamp::now(),
        )
        .await?;
    Ok(Json(request.into()))
}

#[derive(Debug, Deserialize)]
pub struct CreateMortgageBody {
    pub request_id: u64,
}

#[derive(Debug, Serialize)]
pub struct CreateMortgageView {
    pub request_id: u64,
    pub mortgage_tx: String,
    pub transfer_tx: Option<String>,
    pub transfer_confirmed: bool,
}

/// Create the mortgage on the ledger; the authenticated user is the lender.
pub async fn create_mortgage(
    State(state): State<Arc<RpcState>>,
    headers: HeaderMap,
    Json(body): Json<CreateMortgageBody>,
) -> Result<Json<CreateMortgageView>, RpcError> {
    let lender = state.authenticate(&headers)?;
    let outcome = state
        .mortgages
        .create_mortgage(&lender.name, body.request_id)
        .await?;
    Ok(Json(CreateMortgageView {
        request_id: outcome.request_id,
        mortgage_tx: outcome.mortgage_tx.to_string(),
        transfer_tx: outcome.transfer_tx.map(|h| h.to_string()),
        transfer_confirmed: outcome.transfer_confirmed,
    }))
}

#[derive(Debug, Deserialize)]
pub struct RepayMortgageBody {
    pub mortgage_id: u64,
    pub amount: u128,
}

#[derive(Debug, Serialize)]
pub struct RepayMortgageView {
    pub mortgage_id: u64,
    pub repay_tx: String,
    pub outstanding_after: u128,
    pub collateral_released: bool,
}

/// Repay a mortgage; the authenticated user is the lendee.
pub async fn repay_mortgage(
    State(state): State<Arc<RpcState>>,
    headers: HeaderMap,
    Json(body): Json<RepayMortgageBody>,
) -> Result<Json<RepayMortgageView>, RpcError> {
    let lendee = state.authenticate(&headers)?;
    let outcome = state
        .mortgages
        .repay_mortgage(&lendee.name, body.mortgage_id, body.amount)
        .await?;
    Ok(Json(RepayMortgageView {
        mortgage_id: outcome.mortgage_id,
        repay_tx: outcome.repay_tx.to_string(),
        outstanding_after: outcome.outstanding_after,
        collateral_released: outcome.collateral_released,
    }))
}

/// Mortgage requests visible to the authenticated user: their own, plus
/// those addressed to them as lender.
pub async fn list_requests(
    State(state): State<Arc<RpcState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<MortgageRequestView>>, RpcError> {
    let caller = state.authenticate(&headers)?;
    let requests = state.mortgages.list_requests()?;
    let visible: Vec<MortgageRequestView> = requests
        .into_iter()
        .filter(|r| r.requester == caller.name || r.lender == caller.name)
        .map(Into::into)
        .collect();
    Ok(Json(visible))
}
