//! Shared handler state.

use std::sync::Arc;

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use prometheus::Registry;

use parcel_identity::{KycEngine, SessionTable, UserRegistry};
use parcel_keys::Keyring;
use parcel_mortgage::MortgageEngine;
use parcel_property::{OffPlanEngine, TransferEngine};
use parcel_relay::Broadcaster;
use parcel_store::{TransactionStore, User};

use crate::error::RpcError;

/// Faucet settings; absent when the faucet endpoint is disabled.
#[derive(Clone, Debug)]
pub struct FaucetConfig {
    /// Keyring identity funding the faucet.
    pub signer: String,
    pub denom: String,
    /// Amount granted per request.
    pub amount: u128,
}

/// Everything the HTTP handlers need, shared behind an `Arc`.
pub struct RpcState {
    pub registry: UserRegistry,
    pub sessions: SessionTable,
    pub kyc: KycEngine,
    pub mortgages: Arc<MortgageEngine>,
    pub offplan: Arc<OffPlanEngine>,
    pub transfers: Arc<TransferEngine>,
    pub broadcaster: Arc<Broadcaster>,
    pub transactions: Arc<dyn TransactionStore + Send + Sync>,
    pub keyring: Arc<dyn Keyring>,
    /// Prometheus registry encoded by the `/metrics` endpoint.
    pub metrics: Registry,
    pub faucet: Option<FaucetConfig>,
}

impl RpcState {
    /// Resolve the bearer token on a request to its user.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<User, RpcError> {
        let token = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(RpcError::Unauthorized)?;
        Ok(self.sessions.authenticate(token)?)
    }
}
