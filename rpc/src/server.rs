//! Router construction and the serving loop.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::CorsLayer;

use crate::handlers::{health, identity, mortgages, offplan, properties, transactions};
use crate::state::RpcState;

/// Build the full gateway router.
pub fn build_router(state: Arc<RpcState>) -> Router {
    Router::new()
        // Users, sessions, KYC, faucet.
        .route("/users", post(identity::register_user))
        .route("/login", post(identity::login))
        .route("/logout", post(identity::logout))
        .route("/kyc/requests", post(identity::request_kyc).get(identity::list_kyc))
        .route("/kyc/approve", post(identity::approve_kyc))
        .route("/kyc/reject", post(identity::reject_kyc))
        .route("/faucet", post(identity::request_funds))
        // Direct property operations and listings.
        .route("/properties", post(properties::register_property))
        .route("/properties/transfer", post(properties::transfer_shares))
        .route("/properties/metadata", post(properties::edit_metadata))
        .route(
            "/listings",
            post(properties::create_listing).get(properties::list_listings),
        )
        // Mortgages.
        .route(
            "/mortgages/requests",
            post(mortgages::request_mortgage).get(mortgages::list_requests),
        )
        .route("/mortgages", post(mortgages::create_mortgage))
        .route("/mortgages/repay", post(mortgages::repay_mortgage))
        // Off-plan crowdfunding.
        .route(
            "/offplan/properties",
            post(offplan::submit_property).get(offplan::list_properties),
        )
        .route("/offplan/purchases", post(offplan::submit_purchase))
        .route("/offplan/approve", post(offplan::approve_property))
        // Transaction log.
        .route("/transactions", get(transactions::list_transactions))
        .route("/transactions/:hash", get(transactions::get_transaction))
        .route(
            "/transactions/:hash/events",
            get(transactions::get_transaction_events),
        )
        // Operational endpoints.
        .route("/health", get(health::health))
        .route("/metrics", get(health::metrics))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until the shutdown signal flips.
pub async fn serve(
    addr: SocketAddr,
    state: Arc<RpcState>,
    mut shutdown: watch::Receiver<bool>,
) -> std::io::Result<()> {
    let app = build_router(state);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.changed().await;
        })
        .await?;
    tracing::info!("HTTP server stopped");
    Ok(())
}
