//! Tracked-transaction log handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Serialize;

use parcel_store::{LifecycleEvent, TrackedTransaction, TransactionStore};
use parcel_types::TxHash;

use crate::error::RpcError;
use crate::pagination::{paginate, Page, PageParams};
use crate::state::RpcState;

#[derive(Debug, Serialize)]
pub struct EventView {
    pub status: String,
    pub timestamp: u64,
    pub code: u32,
    pub raw_log: String,
    pub chain_events: Vec<ChainEventView>,
}

#[derive(Debug, Serialize)]
pub struct ChainEventView {
    pub kind: String,
    pub attributes: Vec<(String, String)>,
}

impl From<&LifecycleEvent> for EventView {
    fn from(event: &LifecycleEvent) -> Self {
        Self {
            status: event.status.to_string(),
            timestamp: event.timestamp.as_secs(),
            code: event.code,
            raw_log: event.raw_log.clone(),
            chain_events: event
                .chain_events
                .iter()
                .map(|e| ChainEventView {
                    kind: e.kind.clone(),
                    attributes: e.attributes.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransactionView {
    pub hash: String,
    pub kind: String,
    pub status: String,
    pub submitted_at: u64,
    pub events: Vec<EventView>,
}

impl From<&TrackedTransaction> for TransactionView {
    fn from(tx: &TrackedTransaction) -> Self {
        Self {
            hash: tx.hash.to_string(),
            kind: tx.kind.to_string(),
            status: tx.status.to_string(),
            submitted_at: tx.created_at().as_secs(),
            events: tx.events.iter().map(Into::into).collect(),
        }
    }
}

/// Paginated transaction list, oldest first.
pub async fn list_transactions(
    State(state): State<Arc<RpcState>>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<TransactionView>>, RpcError> {
    let mut transactions = state.transactions.iter_transactions()?;
    transactions.sort_by_key(|t| (t.created_at(), t.hash));

    let views: Vec<TransactionView> = transactions.iter().map(Into::into).collect();
    Ok(Json(paginate(views, &params)))
}

fn parse_hash(raw: &str) -> Result<TxHash, RpcError> {
    TxHash::from_hex(raw).ok_or_else(|| RpcError::BadRequest(format!("malformed tx hash: {raw}")))
}

/// One transaction's full lifecycle by hash.
pub async fn get_transaction(
    State(state): State<Arc<RpcState>>,
    Path(hash): Path<String>,
) -> Result<Json<TransactionView>, RpcError> {
    let hash = parse_hash(&hash)?;
    let tx = state.transactions.get_transaction(&hash)?;
    Ok(Json((&tx).into()))
}

/// Just the lifecycle events of one transaction.
pub async fn get_transaction_events(
    State(state): State<Arc<RpcState>>,
    Path(hash): Path<String>,
) -> Result<Json<Vec<EventView>>, RpcError> {
    let hash = parse_hash(&hash)?;
    let tx = state.transactions.get_transaction(&hash)?;
    Ok(Json(tx.events.iter().map(Into::into).collect()))
}
