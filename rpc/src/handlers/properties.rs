//! Direct property operation and listing handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use parcel_store::ForSaleListing;
use parcel_types::{LedgerAddress, Timestamp};

use crate::error::RpcError;
use crate::state::RpcState;

#[derive(Debug, Deserialize)]
pub struct OwnerShare {
    pub address: String,
    pub shares: u64,
}

fn parse_owner_shares(raw: Vec<OwnerShare>) -> Result<Vec<(LedgerAddress, u64)>, RpcError> {
    let mut parsed = Vec::with_capacity(raw.len());
    for owner in raw {
        if !owner.address.starts_with(LedgerAddress::PREFIX) {
            return Err(RpcError::BadRequest(format!(
                "malformed address: {}",
                owner.address
            )));
        }
        parsed.push((LedgerAddress::new(owner.address), owner.shares));
    }
    Ok(parsed)
}

#[derive(Debug, Deserialize)]
pub struct RegisterPropertyBody {
    pub address: String,
    pub region: String,
    pub value: u128,
    pub owners: Vec<OwnerShare>,
}

#[derive(Debug, Serialize)]
pub struct RegisterPropertyView {
    pub property_id: u64,
    pub hash: String,
}

/// Register a property directly on the ledger; the authenticated user signs.
pub async fn register_property(
    State(state): State<Arc<RpcState>>,
    headers: HeaderMap,
    Json(body): Json<RegisterPropertyBody>,
) -> Result<Json<RegisterPropertyView>, RpcError> {
    let owner = state.authenticate(&headers)?;
    let owners = parse_owner_shares(body.owners)?;
    let (addresses, shares): (Vec<_>, Vec<_>) = owners.into_iter().unzip();

    let (property_id, hash) = state
        .transfers
        .register_property(
            &owner.name,
            &body.address,
            &body.region,
            body.value,
            addresses,
            shares,
        )
        .await?;
    Ok(Json(RegisterPropertyView {
        property_id,
        hash: hash.to_string(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct TransferSharesBody {
    pub property_id: u64,
    pub from: Vec<OwnerShare>,
    pub to: Vec<OwnerShare>,
}

#[derive(Debug, Serialize)]
pub struct TxHashView {
    pub hash: String,
}

/// Transfer shares; the authenticated user authorizes the movement.
pub async fn transfer_shares(
    State(state): State<Arc<RpcState>>,
    headers: HeaderMap,
    Json(body): Json<TransferSharesBody>,
) -> Result<Json<TxHashView>, RpcError> {
    let authority = state.authenticate(&headers)?;
    let from = parse_owner_shares(body.from)?;
    let to = parse_owner_shares(body.to)?;

    let hash = state
        .transfers
        .transfer_shares(&authority.name, body.property_id, from, to)
        .await?;
    Ok(Json(TxHashView {
        hash: hash.to_string(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct EditMetadataBody {
    pub property_id: u64,
    pub address: String,
    pub region: String,
}

/// Edit a property's metadata; the authenticated user signs.
pub async fn edit_metadata(
    State(state): State<Arc<RpcState>>,
    headers: HeaderMap,
    Json(body): Json<EditMetadataBody>,
) -> Result<Json<TxHashView>, RpcError> {
    let owner = state.authenticate(&headers)?;
    let hash = state
        .transfers
        .edit_metadata(&owner.name, body.property_id, &body.address, &body.region)
        .await?;
    Ok(Json(TxHashView {
        hash: hash.to_string(),
    }))
}

// ── Listings ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateListingBody {
    pub property_id: u64,
    pub shares: u64,
    pub price: u128,
}

#[derive(Debug, Serialize)]
pub struct ListingView {
    pub id: u64,
    pub property_id: u64,
    pub owner: String,
    pub shares: u64,
    pub price: u128,
}

impl From<ForSaleListing> for ListingView {
    fn from(listing: ForSaleListing) -> Self {
        Self {
            id: listing.id,
            property_id: listing.property_id,
            owner: listing.owner.to_string(),
            shares: listing.shares,
            price: listing.price,
        }
    }
}

/// Offer some of the authenticated user's shares for resale.
pub async fn create_listing(
    State(state): State<Arc<RpcState>>,
    headers: HeaderMap,
    Json(body): Json<CreateListingBody>,
) -> Result<Json<ListingView>, RpcError> {
    let owner = state.authenticate(&headers)?;
    let listing = state.transfers.create_listing(
        &owner.name,
        body.property_id,
        body.shares,
        body.price,
        Timestamp::now(),
    )?;
    Ok(Json(listing.into()))
}

/// All live resale listings.
pub async fn list_listings(
    State(state): State<Arc<RpcState>>,
) -> Result<Json<Vec<ListingView>>, RpcError> {
    let listings = state.transfers.list_listings()?;
    Ok(Json(listings.into_iter().map(Into::into).collect()))
}
