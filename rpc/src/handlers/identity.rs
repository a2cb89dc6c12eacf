//! User, session, KYC, and faucet handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use parcel_keys::Keyring;
use parcel_messages::{LedgerMsg, SendFunds};
use parcel_store::{KycRequest, User};
use parcel_types::{Role, Timestamp};

use crate::error::RpcError;
use crate::state::RpcState;

// ── Users ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterUserRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct UserView {
    pub name: String,
    pub address: String,
    pub role: String,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            name: user.name,
            address: user.address.to_string(),
            role: user.role.to_string(),
        }
    }
}

/// Register a new user with a fresh signing key and the plain `user` role.
/// Privileged roles only exist through administrative seeding.
pub async fn register_user(
    State(state): State<Arc<RpcState>>,
    Json(body): Json<RegisterUserRequest>,
) -> Result<Json<UserView>, RpcError> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(RpcError::BadRequest("user name is empty".into()));
    }
    if state.registry.exists(name)? {
        return Err(RpcError::Conflict(format!("user already registered: {name}")));
    }

    let address = state
        .keyring
        .generate(name)
        .map_err(|e| RpcError::Internal(e.to_string()))?;
    let user = state
        .registry
        .register(name, address, Role::User, Timestamp::now())?;
    Ok(Json(user.into()))
}

// ── Sessions ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserView,
}

pub async fn login(
    State(state): State<Arc<RpcState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, RpcError> {
    let token = state.sessions.login(&body.name, Timestamp::now())?;
    let user = state.registry.get(&body.name)?;
    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub logged_out: bool,
}

pub async fn logout(
    State(state): State<Arc<RpcState>>,
    headers: HeaderMap,
) -> Result<Json<LogoutResponse>, RpcError> {
    let token = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(RpcError::Unauthorized)?;
    state.sessions.logout(token)?;
    Ok(Json(LogoutResponse { logged_out: true }))
}

// ── KYC ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct KycView {
    pub id: u64,
    pub requester: String,
    pub status: String,
}

impl From<KycRequest> for KycView {
    fn from(request: KycRequest) -> Self {
        Self {
            id: request.id,
            requester: request.requester,
            status: format!("{:?}", request.status).to_lowercase(),
        }
    }
}

/// File a verification request for the authenticated user.
pub async fn request_kyc(
    State(state): State<Arc<RpcState>>,
    headers: HeaderMap,
) -> Result<Json<KycView>, RpcError> {
    let user = state.authenticate(&headers)?;
    let request = state.kyc.request_verification(&user.name, Timestamp::now())?;
    Ok(Json(request.into()))
}

#[derive(Debug, Deserialize)]
pub struct KycDecisionRequest {
    pub request_id: u64,
}

pub async fn approve_kyc(
    State(state): State<Arc<RpcState>>,
    headers: HeaderMap,
    Json(body): Json<KycDecisionRequest>,
) -> Result<Json<KycView>, RpcError> {
    let regulator = state.authenticate(&headers)?;
    let request = state.kyc.approve_verification(&regulator.name, body.request_id)?;
    Ok(Json(request.into()))
}

pub async fn reject_kyc(
    State(state): State<Arc<RpcState>>,
    headers: HeaderMap,
    Json(body): Json<KycDecisionRequest>,
) -> Result<Json<KycView>, RpcError> {
    let regulator = state.authenticate(&headers)?;
    let request = state.kyc.reject_verification(&regulator.name, body.request_id)?;
    Ok(Json(request.into()))
}

pub async fn list_kyc(
    State(state): State<Arc<RpcState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<KycView>>, RpcError> {
    let caller = state.authenticate(&headers)?;
    let requests = state.kyc.list()?;
    // Regulators see everything; everyone else sees their own requests.
    let visible: Vec<KycView> = requests
        .into_iter()
        .filter(|r| caller.role == Role::Regulator || r.requester == caller.name)
        .map(Into::into)
        .collect();
    Ok(Json(visible))
}

// ── Faucet ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct FaucetResponse {
    pub hash: String,
    pub amount: u128,
    pub denom: String,
}

/// Grant the authenticated user a fixed amount of funds from the faucet
/// account. Only available when enabled in configuration.
pub async fn request_funds(
    State(state): State<Arc<RpcState>>,
    headers: HeaderMap,
) -> Result<Json<FaucetResponse>, RpcError> {
    let user = state.authenticate(&headers)?;
    let faucet = state
        .faucet
        .as_ref()
        .ok_or_else(|| RpcError::NotFound("faucet is disabled".into()))?;

    let from = state
        .keyring
        .address_of(&faucet.signer)
        .map_err(|e| RpcError::Internal(e.to_string()))?;
    let msg = LedgerMsg::SendFunds(SendFunds {
        from,
        to: user.address,
        amount: faucet.amount,
        denom: faucet.denom.clone(),
    });
    let hash = state.broadcaster.submit(&faucet.signer, msg).await?;

    Ok(Json(FaucetResponse {
        hash: hash.to_string(),
        amount: faucet.amount,
        denom: faucet.denom.clone(),
    }))
}
