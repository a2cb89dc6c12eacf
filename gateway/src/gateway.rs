//! Gateway wiring and lifecycle.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use parcel_identity::{KycEngine, SessionTable, UserRegistry};
use parcel_keys::LocalKeyring;
use parcel_ledger::{HttpLedgerClient, LedgerClient};
use parcel_mortgage::MortgageEngine;
use parcel_property::{OffPlanEngine, TransferEngine};
use parcel_relay::{Broadcaster, ConfirmationTracker, ReconciliationSweep};
use parcel_rpc::{FaucetConfig, RpcState};
use parcel_simulator::{SimulatorConfig, WorkloadDriver};
use parcel_store::{ListingStore, PropertyStore, TransactionStore, UserStore};
use parcel_store_lmdb::LmdbStore;
use parcel_types::{Timestamp, TxStatus};

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::metrics::GatewayMetrics;
use crate::seed;

/// Timeout for background tasks to finish during shutdown.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// A running Parcel gateway.
pub struct Gateway {
    config: GatewayConfig,
    store: Arc<LmdbStore>,
    state: Arc<RpcState>,
    metrics: Arc<GatewayMetrics>,
    sweep: Arc<ReconciliationSweep>,
    simulator: Option<WorkloadDriver>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl Gateway {
    /// Build the gateway from configuration: open storage, assemble the
    /// keyring, seed the well-known identities, and wire every engine.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let store = Arc::new(LmdbStore::open(&config.data_dir)?);

        let keyring = match (&config.keystore_dir, &config.keystore_password) {
            (Some(dir), Some(password)) => {
                let ring = LocalKeyring::from_keystore_dir(dir, password)?;
                tracing::info!(identities = ring.identities().len(), "loaded keystore directory");
                Arc::new(ring)
            }
            (Some(_), None) => {
                return Err(GatewayError::Config(
                    "keystore_dir set without keystore_password".into(),
                ));
            }
            (None, _) => Arc::new(LocalKeyring::new()),
        };

        let registry = UserRegistry::new(store.clone() as Arc<dyn UserStore + Send + Sync>);
        let now = Timestamp::now();
        seed::seed_well_known(&keyring, &registry, now)?;

        let sessions = SessionTable::new(store.clone(), registry.clone());
        let kyc = KycEngine::new(store.clone(), registry.clone());

        let ledger: Arc<dyn LedgerClient> =
            Arc::new(HttpLedgerClient::new(config.ledger_endpoint.clone()));
        let transactions: Arc<dyn TransactionStore + Send + Sync> = store.clone();

        let broadcaster = Arc::new(Broadcaster::new(
            ledger.clone(),
            keyring.clone(),
            transactions.clone(),
        ));
        let tracker = Arc::new(ConfirmationTracker::with_timing(
            ledger.clone(),
            transactions.clone(),
            Duration::from_millis(config.poll_interval_ms),
            Duration::from_millis(config.confirm_timeout_ms),
        ));
        let sweep = Arc::new(ReconciliationSweep::new(
            ledger.clone(),
            transactions.clone(),
        ));

        let mortgages = Arc::new(MortgageEngine::new(
            store.clone(),
            registry.clone(),
            broadcaster.clone(),
            tracker.clone(),
            ledger.clone(),
            keyring.clone(),
            seed::REGULATOR,
            seed::MARKER_MODULE,
        ));
        let offplan = Arc::new(OffPlanEngine::new(
            store.clone(),
            store.clone(),
            store.clone(),
            registry.clone(),
            broadcaster.clone(),
            tracker.clone(),
        ));
        let transfers = Arc::new(TransferEngine::new(
            store.clone(),
            store.clone(),
            registry.clone(),
            broadcaster.clone(),
            tracker.clone(),
            keyring.clone(),
        ));

        let simulator = if config.enable_simulator {
            let actors = seed::seed_simulator_actors(
                &keyring,
                &registry,
                config.simulator_actors,
                now,
            )?;
            Some(WorkloadDriver::new(
                transfers.clone(),
                registry.clone(),
                actors,
                SimulatorConfig {
                    interval: Duration::from_millis(config.simulator_interval_ms),
                    seed: config.simulator_seed,
                    max_owners: 4,
                    max_recipients: 3,
                },
            ))
        } else {
            None
        };

        let metrics = Arc::new(GatewayMetrics::new());
        let faucet = config.enable_faucet.then(|| FaucetConfig {
            signer: seed::FAUCET.to_string(),
            denom: config.denom.clone(),
            amount: config.faucet_amount,
        });

        let state = Arc::new(RpcState {
            registry,
            sessions,
            kyc,
            mortgages,
            offplan,
            transfers,
            broadcaster,
            transactions,
            keyring,
            metrics: metrics.registry.clone(),
            faucet,
        });

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Ok(Self {
            config,
            store,
            state,
            metrics,
            sweep,
            simulator,
            shutdown_tx,
            shutdown_rx,
            tasks: Vec::new(),
        })
    }

    /// Shared handler state (used by the HTTP server and tests).
    pub fn state(&self) -> Arc<RpcState> {
        self.state.clone()
    }

    /// Spawn the HTTP server and every background task.
    pub fn start(&mut self) -> Result<(), GatewayError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.rpc_port));
        let state = self.state.clone();
        let rx = self.shutdown_rx.clone();
        self.tasks.push(tokio::spawn(async move {
            if let Err(e) = parcel_rpc::serve(addr, state, rx).await {
                tracing::error!("HTTP server terminated: {e}");
            }
        }));

        if self.config.enable_sweep {
            let sweep = self.sweep.clone();
            let metrics = self.metrics.clone();
            let interval = Duration::from_secs(self.config.sweep_interval_secs);
            let mut rx = self.shutdown_rx.clone();
            self.tasks.push(tokio::spawn(async move {
                loop {
                    tokio::select! {
                        _ = rx.changed() => break,
                        _ = tokio::time::sleep(interval) => {
                            match sweep.run_once(Timestamp::now()).await {
                                Ok(report) => {
                                    metrics.sweep_passes.inc();
                                    metrics.sweep_resolved.inc_by(report.resolved as u64);
                                }
                                Err(e) => tracing::warn!("sweep pass failed: {e}"),
                            }
                        }
                    }
                }
            }));
        }

        {
            let store = self.store.clone();
            let metrics = self.metrics.clone();
            let interval = Duration::from_secs(self.config.metrics_interval_secs);
            let mut rx = self.shutdown_rx.clone();
            self.tasks.push(tokio::spawn(async move {
                loop {
                    tokio::select! {
                        _ = rx.changed() => break,
                        _ = tokio::time::sleep(interval) => {
                            sample_metrics(&store, &metrics);
                        }
                    }
                }
            }));
        }

        if let Some(driver) = self.simulator.take() {
            let rx = self.shutdown_rx.clone();
            self.tasks.push(tokio::spawn(driver.run(rx)));
        }

        tracing::info!(
            rpc_port = self.config.rpc_port,
            ledger = %self.config.ledger_endpoint,
            sweep = self.config.enable_sweep,
            simulator = self.config.enable_simulator,
            "gateway started"
        );
        Ok(())
    }

    /// Signal every task to stop and wait for them (bounded).
    pub async fn stop(&mut self) {
        let _ = self.shutdown_tx.send(true);
        for task in self.tasks.drain(..) {
            if tokio::time::timeout(SHUTDOWN_TIMEOUT, task).await.is_err() {
                tracing::warn!("background task did not stop within the shutdown timeout");
            }
        }
        tracing::info!("gateway stopped");
    }
}

/// Refresh the store-derived gauges.
fn sample_metrics(store: &LmdbStore, metrics: &GatewayMetrics) {
    let transactions = match store.iter_transactions() {
        Ok(txs) => txs,
        Err(e) => {
            tracing::warn!("metrics sample failed: {e}");
            return;
        }
    };
    let mut submitted = 0i64;
    let mut confirmed = 0i64;
    let mut failed = 0i64;
    for tx in &transactions {
        match tx.status {
            TxStatus::Submitted => submitted += 1,
            TxStatus::Confirmed => confirmed += 1,
            TxStatus::Failed => failed += 1,
        }
    }
    metrics.txs_submitted.set(submitted);
    metrics.txs_confirmed.set(confirmed);
    metrics.txs_failed.set(failed);

    if let Ok(users) = store.iter_users() {
        metrics.users.set(users.len() as i64);
    }
    if let Ok(properties) = store.iter_properties() {
        metrics.properties.set(properties.len() as i64);
    }
    if let Ok(listings) = store.iter_listings() {
        metrics.listings.set(listings.len() as i64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(dir: &std::path::Path) -> GatewayConfig {
        GatewayConfig {
            data_dir: dir.to_path_buf(),
            ..GatewayConfig::default()
        }
    }

    #[tokio::test]
    async fn gateway_wires_and_seeds_identities() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = Gateway::new(test_config(dir.path())).unwrap();

        let state = gateway.state();
        assert!(state.registry.exists(seed::REGULATOR).unwrap());
        assert!(state.registry.exists(seed::BANK).unwrap());
        assert!(state.faucet.is_none());
    }

    #[tokio::test]
    async fn reopen_reuses_seeded_identities() {
        let dir = tempfile::tempdir().unwrap();
        let first_address = {
            let gateway = Gateway::new(test_config(dir.path())).unwrap();
            gateway.state().registry.get(seed::REGULATOR).unwrap().address
        };
        let gateway = Gateway::new(test_config(dir.path())).unwrap();
        let second_address = gateway.state().registry.get(seed::REGULATOR).unwrap().address;
        assert_eq!(first_address, second_address);
    }

    #[tokio::test]
    async fn keystore_dir_without_password_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = GatewayConfig {
            data_dir: dir.path().to_path_buf(),
            keystore_dir: Some(dir.path().join("keys")),
            keystore_password: None,
            ..GatewayConfig::default()
        };
        assert!(matches!(
            Gateway::new(config),
            Err(GatewayError::Config(_))
        ));
    }
}
