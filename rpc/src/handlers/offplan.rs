//! Off-plan crowdfunding handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use parcel_store::OffPlanProperty;
use parcel_types::Timestamp;

use crate::error::RpcError;
use crate::state::RpcState;

#[derive(Debug, Deserialize)]
pub struct SubmitPropertyBody {
    pub address: String,
    pub region: String,
    pub value: u128,
    pub total_shares: u64,
}

#[derive(Debug, Serialize)]
pub struct OffPlanPropertyView {
    pub id: u64,
    pub developer: String,
    pub address: String,
    pub region: String,
    pub value: u128,
    pub total_shares: u64,
    pub status: String,
    pub committed_usd: u128,
}

impl OffPlanPropertyView {
    fn new(property: OffPlanProperty, committed_usd: u128) -> Self {
        Self {
            id: property.id,
            developer: property.developer,
            address: property.address,
            region: property.region,
            value: property.value,
            total_shares: property.total_shares,
            status: property.status.to_string(),
            committed_usd,
        }
    }
}

/// Submit a property for crowdfunding; the authenticated user must be a
/// developer.
pub async fn submit_property(
    State(state): State<Arc<RpcState>>,
    headers: HeaderMap,
    Json(body): Json<SubmitPropertyBody>,
) -> Result<Json<OffPlanPropertyView>, RpcError> {
    let developer = state.authenticate(&headers)?;
    let property = state.offplan.submit_property(
        &developer.name,
        &body.address,
        &body.region,
        body.value,
        body.total_shares,
        Timestamp::now(),
    )?;
    Ok(Json(OffPlanPropertyView::new(property, 0)))
}

#[derive(Debug, Deserialize)]
pub struct SubmitPurchaseBody {
    pub property_id: u64,
    pub amount_usd: u128,
}

#[derive(Debug, Serialize)]
pub struct PurchaseView {
    pub id: u64,
    pub property_id: u64,
    pub user: String,
    pub amount_usd: u128,
    pub percent_bps: u32,
    pub status: String,
    pub fully_funded: bool,
}

/// Purchase a slice of an off-plan property; the authenticated user must be
/// an investor.
pub async fn submit_purchase(
    State(state): State<Arc<RpcState>>,
    headers: HeaderMap,
    Json(body): Json<SubmitPurchaseBody>,
) -> Result<Json<PurchaseView>, RpcError> {
    let user = state.authenticate(&headers)?;
    let outcome = state
        .offplan
        .submit_purchase(&user.name, body.property_id, body.amount_usd, Timestamp::now())
        .await?;
    Ok(Json(PurchaseView {
        id: outcome.purchase.id,
        property_id: outcome.purchase.property_id,
        user: outcome.purchase.user,
        amount_usd: outcome.purchase.amount_usd,
        percent_bps: outcome.purchase.percent_bps,
        status: "accepted".to_string(),
        fully_funded: outcome.fully_funded,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ApprovePropertyBody {
    pub property_id: u64,
}

#[derive(Debug, Serialize)]
pub struct ApprovePropertyView {
    pub property_id: u64,
    pub registration_tx: String,
}

/// Register a fully funded property on the ledger; the authenticated user
/// must be a regulator.
pub async fn approve_property(
    State(state): State<Arc<RpcState>>,
    headers: HeaderMap,
    Json(body): Json<ApprovePropertyBody>,
) -> Result<Json<ApprovePropertyView>, RpcError> {
    let regulator = state.authenticate(&headers)?;
    let hash = state
        .offplan
        .approve_property(&regulator.name, body.property_id)
        .await?;
    Ok(Json(ApprovePropertyView {
        property_id: body.property_id,
        registration_tx: hash.to_string(),
    }))
}

/// List every off-plan property with its committed funding.
pub async fn list_properties(
    State(state): State<Arc<RpcState>>,
) -> Result<Json<Vec<OffPlanPropertyView>>, RpcError> {
    let properties = state.offplan.list_properties()?;
    let mut views = Vec::with_capacity(properties.len());
    for property in properties {
        let committed: u128 = state
            .offplan
            .list_purchases(property.id)?
            .iter()
            .map(|p| p.amount_usd)
            .sum();
        views.push(OffPlanPropertyView::new(property, committed));
    }
    Ok(Json(views))
}
