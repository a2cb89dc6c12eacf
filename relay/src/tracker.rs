//! Confirmation tracking — polls the ledger until a submitted transaction
//! reaches a terminal status.

use std::sync::Arc;
use std::time::Duration;

use parcel_ledger::{IncludedTx, LedgerClient, TxLookup};
use parcel_store::{LifecycleEvent, TransactionStore};
use parcel_types::{Timestamp, TxHash, TxStatus};

use crate::error::RelayError;

/// Interval between inclusion polls.
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);
/// Overall ceiling on one confirmation wait.
pub const CONFIRM_TIMEOUT: Duration = Duration::from_secs(30);

/// Polls the ledger for a transaction's inclusion and maintains its
/// append-only lifecycle log.
///
/// Updates are idempotent: the record is located by hash, duplicate
/// `Submitted` events are dropped, and a terminal event is appended at most
/// once — invoking [`await_confirmation`](Self::await_confirmation) twice
/// for the same hash appends nothing the second time.
pub struct ConfirmationTracker {
    ledger: Arc<dyn LedgerClient>,
    transactions: Arc<dyn TransactionStore + Send + Sync>,
    poll_interval: Duration,
    timeout: Duration,
}

impl ConfirmationTracker {
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        transactions: Arc<dyn TransactionStore + Send + Sync>,
    ) -> Self {
        Self::with_timing(ledger, transactions, POLL_INTERVAL, CONFIRM_TIMEOUT)
    }

    pub fn with_timing(
        ledger: Arc<dyn LedgerClient>,
        transactions: Arc<dyn TransactionStore + Send + Sync>,
        poll_interval: Duration,
        timeout: Duration,
    ) -> Self {
        Self {
            ledger,
            transactions,
            poll_interval,
            timeout,
        }
    }

    /// Wait for `hash` to reach a terminal status.
    ///
    /// "Not yet found" is retried every poll interval until the overall
    /// timeout; any other query error is terminal and records a `Failed`
    /// event. On timeout the record is left `Submitted` and
    /// [`RelayError::ConfirmationTimeout`] is returned — the reconciliation
    /// sweep picks such records up later.
    pub async fn await_confirmation(&self, hash: TxHash) -> Result<TxStatus, RelayError> {
        let deadline = tokio::time::Instant::now() + self.timeout;
        loop {
            match self.ledger.get_transaction_by_hash(&hash).await {
                Ok(TxLookup::Included(included)) => {
                    return self.record_inclusion(&hash, &included);
                }
                Ok(TxLookup::NotFound) => {
                    if tokio::time::Instant::now() + self.poll_interval > deadline {
                        tracing::warn!(%hash, "confirmation wait timed out; record left submitted");
                        return Err(RelayError::ConfirmationTimeout { hash });
                    }
                    tokio::time::sleep(self.poll_interval).await;
                }
                Err(e) => {
                    self.record_query_failure(&hash, &e.to_string())?;
                    return Err(e.into());
                }
            }
        }
    }

    /// Classify an included transaction and append its terminal event.
    pub(crate) fn record_inclusion(
        &self,
        hash: &TxHash,
        included: &IncludedTx,
    ) -> Result<TxStatus, RelayError> {
        let mut record = self.transactions.get_transaction(hash)?;
        let status = if included.code == 0 {
            TxStatus::Confirmed
        } else {
            TxStatus::Failed
        };
        let appended = record.append_event(LifecycleEvent {
            status,
            timestamp: Timestamp::now(),
            code: included.code,
            raw_log: included.raw_log.clone(),
            chain_events: included.events.clone(),
        });
        if appended {
            // Write-through: every append re-persists the whole record.
            self.transactions.put_transaction(&record)?;
            tracing::info!(%hash, %status, height = included.height, "transaction reached terminal status");
        }
        Ok(record.status)
    }

    fn record_query_failure(&self, hash: &TxHash, detail: &str) -> Result<(), RelayError> {
        let mut record = self.transactions.get_transaction(hash)?;
        let appended = record.append_event(LifecycleEvent {
            status: TxStatus::Failed,
            timestamp: Timestamp::now(),
            code: 0,
            raw_log: detail.to_string(),
            chain_events: Vec::new(),
        });
        if appended {
            self.transactions.put_transaction(&record)?;
            tracing::error!(%hash, "terminal query error while tracking: {detail}");
        }
        Ok(())
    }
}
