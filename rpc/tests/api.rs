//! End-to-end API tests over the handler layer.
//!
//! The full stack — engines, relay, session table — runs against the
//! nullable ledger and store, so every flow here exercises the same code
//! paths as real HTTP traffic minus the socket.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::Json;

use parcel_identity::{KycEngine, SessionTable, UserRegistry};
use parcel_keys::{keypair_from_seed, Keyring, LocalKeyring};
use parcel_ledger::{MortgageRecord, MortgageStatus};
use parcel_mortgage::MortgageEngine;
use parcel_nullables::{NullLedger, NullStore};
use parcel_property::{OffPlanEngine, TransferEngine};
use parcel_relay::{Broadcaster, ConfirmationTracker};
use parcel_rpc::handlers::{identity, mortgages, offplan, transactions};
use parcel_rpc::pagination::PageParams;
use parcel_rpc::{build_router, FaucetConfig, RpcState};
use parcel_store::{TrackedTransaction, TransactionStore};
use parcel_types::{Role, Timestamp, TxHash, TxKind};

struct Harness {
    state: Arc<RpcState>,
    ledger: Arc<NullLedger>,
    store: Arc<NullStore>,
    keyring: Arc<LocalKeyring>,
}

fn harness() -> Harness {
    let ledger = Arc::new(NullLedger::new());
    let store = Arc::new(NullStore::new());
    let keyring = Arc::new(LocalKeyring::new());

    let registry = UserRegistry::new(store.clone());
    let sessions = SessionTable::new(store.clone(), registry.clone());
    let kyc = KycEngine::new(store.clone(), registry.clone());

    let broadcaster = Arc::new(Broadcaster::new(
        ledger.clone(),
        keyring.clone(),
        store.clone(),
    ));
    let tracker = Arc::new(ConfirmationTracker::with_timing(
        ledger.clone(),
        store.clone(),
        Duration::from_millis(2),
        Duration::from_millis(50),
    ));

    // Seed the privileged identities the flows need.
    for (name, role, seed) in [
        ("regulator", Role::Regulator, 1u8),
        ("northgate_bank", Role::Bank, 2),
        ("marker_module", Role::Admin, 3),
        ("faucet", Role::Admin, 4),
        ("devon", Role::Developer, 5),
    ] {
        keyring.insert(name, keypair_from_seed(&[seed; 32]));
        registry
            .register(
                name,
                keyring.address_of(name).unwrap(),
                role,
                Timestamp::new(1),
            )
            .unwrap();
    }

    let mortgage_engine = Arc::new(MortgageEngine::new(
        store.clone(),
        registry.clone(),
        broadcaster.clone(),
        tracker.clone(),
        ledger.clone(),
        keyring.clone(),
        "regulator",
        "marker_module",
    ));
    let offplan_engine = Arc::new(OffPlanEngine::new(
        store.clone(),
        store.clone(),
        store.clone(),
        registry.clone(),
        broadcaster.clone(),
        tracker.clone(),
    ));
    let transfer_engine = Arc::new(TransferEngine::new(
        store.clone(),
        store.clone(),
        registry.clone(),
        broadcaster.clone(),
        tracker.clone(),
        keyring.clone(),
    ));

    let state = Arc::new(RpcState {
        registry,
        sessions,
        kyc,
        mortgages: mortgage_engine,
        offplan: offplan_engine,
        transfers: transfer_engine,
        broadcaster,
        transactions: store.clone(),
        keyring: keyring.clone(),
        metrics: prometheus::Registry::new(),
        faucet: Some(FaucetConfig {
            signer: "faucet".to_string(),
            denom: "uparc".to_string(),
            amount: 1_000_000,
        }),
    });

    Harness {
        state,
        ledger,
        store,
        keyring,
    }
}

fn bearer(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, format!("Bearer {token}").parse().unwrap());
    headers
}

async fn login(h: &Harness, name: &str) -> HeaderMap {
    let response = identity::login(
        State(h.state.clone()),
        Json(identity::LoginRequest {
            name: name.to_string(),
        }),
    )
    .await
    .unwrap();
    bearer(&response.0.token)
}

/// Register a user through the API and promote them to investor through the
/// KYC flow.
async fn onboard_investor(h: &Harness, name: &str) -> HeaderMap {
    identity::register_user(
        State(h.state.clone()),
        Json(identity::RegisterUserRequest {
            name: name.to_string(),
        }),
    )
    .await
    .unwrap();

    let user_headers = login(h, name).await;
    let request = identity::request_kyc(State(h.state.clone()), user_headers.clone())
        .await
        .unwrap();

    let regulator_headers = login(h, "regulator").await;
    identity::approve_kyc(
        State(h.state.clone()),
        regulator_headers,
        Json(identity::KycDecisionRequest {
            request_id: request.0.id,
        }),
    )
    .await
    .unwrap();

    user_headers
}

#[tokio::test]
async fn router_builds() {
    let h = harness();
    let _router = build_router(h.state);
}

#[tokio::test]
async fn unauthenticated_requests_are_rejected() {
    let h = harness();
    let err = identity::request_kyc(State(h.state.clone()), HeaderMap::new())
        .await
        .unwrap_err();
    assert!(matches!(err, parcel_rpc::RpcError::Unauthorized));
}

#[tokio::test]
async fn kyc_promotes_user_to_investor() {
    let h = harness();
    onboard_investor(&h, "alice").await;
    assert_eq!(
        h.state.registry.get("alice").unwrap().role,
        Role::Investor
    );
}

#[tokio::test]
async fn offplan_flow_scenario() {
    let h = harness();
    let alice = onboard_investor(&h, "alice").await;
    let bela = onboard_investor(&h, "bela").await;
    let devon = login(&h, "devon").await;
    let regulator = login(&h, "regulator").await;

    // Developer submits a 1,000,000 / 1000-share property.
    let property = offplan::submit_property(
        State(h.state.clone()),
        devon,
        Json(offplan::SubmitPropertyBody {
            address: "12 Harbor Way".into(),
            region: "north".into(),
            value: 1_000_000,
            total_shares: 1000,
        }),
    )
    .await
    .unwrap();
    let property_id = property.0.id;

    // 600k + 400k fills it exactly.
    let first = offplan::submit_purchase(
        State(h.state.clone()),
        alice,
        Json(offplan::SubmitPurchaseBody {
            property_id,
            amount_usd: 600_000,
        }),
    )
    .await
    .unwrap();
    assert_eq!(first.0.percent_bps, 6000);
    assert!(!first.0.fully_funded);

    let second = offplan::submit_purchase(
        State(h.state.clone()),
        bela,
        Json(offplan::SubmitPurchaseBody {
            property_id,
            amount_usd: 400_000,
        }),
    )
    .await
    .unwrap();
    assert!(second.0.fully_funded);

    // Regulator approval registers on the ledger with 600/400 shares.
    offplan::approve_property(
        State(h.state.clone()),
        regulator,
        Json(offplan::ApprovePropertyBody { property_id }),
    )
    .await
    .unwrap();

    let listed = offplan::list_properties(State(h.state.clone())).await.unwrap();
    assert_eq!(listed.0[0].status, "registered");
    assert_eq!(listed.0[0].committed_usd, 1_000_000);

    let registration = h
        .ledger
        .submissions()
        .into_iter()
        .find_map(|tx| match tx.doc.msg {
            parcel_messages::LedgerMsg::RegisterProperty(r) => Some(r),
            _ => None,
        })
        .expect("registration submitted");
    let mut shares = registration.shares.clone();
    shares.sort_unstable();
    assert_eq!(shares, vec![400, 600]);
}

#[tokio::test]
async fn mortgage_flow_scenario() {
    let h = harness();
    let alice = onboard_investor(&h, "alice").await;
    let bank = login(&h, "northgate_bank").await;

    let request = mortgages::request_mortgage(
        State(h.state.clone()),
        alice.clone(),
        Json(mortgages::MortgageRequestBody {
            lender: "northgate_bank".into(),
            collateral: "deed-7".into(),
            amount: 1000,
            annual_rate_bps: 450,
            term_months: 240,
            purchase: None,
        }),
    )
    .await
    .unwrap();
    assert_eq!(request.0.status, "pending");

    let created = mortgages::create_mortgage(
        State(h.state.clone()),
        bank,
        Json(mortgages::CreateMortgageBody {
            request_id: request.0.id,
        }),
    )
    .await
    .unwrap();
    assert!(created.0.transfer_tx.is_none());

    // Partial repayment: 400 leaves 600 outstanding.
    let first = mortgages::repay_mortgage(
        State(h.state.clone()),
        alice.clone(),
        Json(mortgages::RepayMortgageBody {
            mortgage_id: 1,
            amount: 400,
        }),
    )
    .await
    .unwrap();
    assert_eq!(first.0.outstanding_after, 600);
    assert!(!first.0.collateral_released);

    // Final repayment: zero outstanding, paid, exactly one marker burn.
    let second = mortgages::repay_mortgage(
        State(h.state.clone()),
        alice,
        Json(mortgages::RepayMortgageBody {
            mortgage_id: 1,
            amount: 600,
        }),
    )
    .await
    .unwrap();
    assert_eq!(second.0.outstanding_after, 0);
    assert!(second.0.collateral_released);
    assert_eq!(h.ledger.mortgage(1).unwrap().status, MortgageStatus::Paid);
    assert_eq!(h.ledger.burned_markers().len(), 1);
}

#[tokio::test]
async fn repay_rejects_non_lendee() {
    let h = harness();
    onboard_investor(&h, "alice").await;
    let mallory = onboard_investor(&h, "mallory").await;

    let alice_address = h.keyring.address_of("alice").unwrap();
    h.ledger.set_mortgage(MortgageRecord {
        id: 9,
        index: 9,
        lender: h.keyring.address_of("northgate_bank").unwrap(),
        lendee: alice_address,
        collateral: "deed-9".into(),
        amount: 500,
        outstanding_amount: 500,
        status: MortgageStatus::Approved,
    });

    let err = mortgages::repay_mortgage(
        State(h.state.clone()),
        mallory,
        Json(mortgages::RepayMortgageBody {
            mortgage_id: 9,
            amount: 100,
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, parcel_rpc::RpcError::Forbidden(_)));
}

#[tokio::test]
async fn transaction_pagination_scenario() {
    let h = harness();

    // Seed 7 tracked transactions with increasing timestamps.
    for i in 1u8..=7 {
        let tx = TrackedTransaction::submitted(
            TxHash::new([i; 32]),
            TxKind::SendFunds,
            Timestamp::new(i as u64),
        );
        h.store.put_transaction(&tx).unwrap();
    }

    let page2 = transactions::list_transactions(
        State(h.state.clone()),
        Query(PageParams {
            page: Some(2),
            page_size: Some(3),
        }),
    )
    .await
    .unwrap();
    let hashes: Vec<String> = page2.0.items.iter().map(|t| t.hash.clone()).collect();
    assert_eq!(hashes.len(), 3);
    assert_eq!(hashes[0], TxHash::new([4u8; 32]).to_string());
    assert_eq!(hashes[2], TxHash::new([6u8; 32]).to_string());
    assert!(page2.0.has_next);
    assert!(page2.0.has_prev);

    let page3 = transactions::list_transactions(
        State(h.state.clone()),
        Query(PageParams {
            page: Some(3),
            page_size: Some(3),
        }),
    )
    .await
    .unwrap();
    assert_eq!(page3.0.items.len(), 1);
    assert_eq!(page3.0.items[0].hash, TxHash::new([7u8; 32]).to_string());
    assert!(!page3.0.has_next);
    assert!(page3.0.has_prev);
}

#[tokio::test]
async fn transaction_detail_and_events_by_hash() {
    let h = harness();
    let alice = onboard_investor(&h, "alice").await;

    let response = identity::request_funds(State(h.state.clone()), alice)
        .await
        .unwrap();
    let hash = response.0.hash.clone();

    let detail = transactions::get_transaction(State(h.state.clone()), Path(hash.clone()))
        .await
        .unwrap();
    assert_eq!(detail.0.kind, "send_funds");
    assert_eq!(detail.0.status, "submitted");

    let events = transactions::get_transaction_events(State(h.state.clone()), Path(hash))
        .await
        .unwrap();
    assert_eq!(events.0.len(), 1);
    assert_eq!(events.0[0].status, "submitted");
}

#[tokio::test]
async fn logout_revokes_session() {
    let h = harness();
    onboard_investor(&h, "alice").await;
    let headers = login(&h, "alice").await;

    identity::logout(State(h.state.clone()), headers.clone())
        .await
        .unwrap();
    let err = identity::request_kyc(State(h.state.clone()), headers)
        .await
        .unwrap_err();
    assert!(matches!(err, parcel_rpc::RpcError::Unauthorized));
}
