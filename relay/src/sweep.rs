//! Reconciliation sweep for transactions a timed-out wait left behind.
//!
//! A confirmation wait that times out leaves its record `Submitted` with no
//! one polling for it. The sweep re-polls every such record older than a
//! cutoff once per pass and appends the terminal event when the ledger has
//! since included the transaction.

use std::sync::Arc;
use std::time::Duration;

use parcel_ledger::{LedgerClient, TxLookup};
use parcel_store::TransactionStore;
use parcel_types::Timestamp;

use crate::error::RelayError;
use crate::tracker::ConfirmationTracker;

/// How old a `Submitted` record must be before the sweep re-polls it.
/// Matches the confirmation ceiling: anything younger still has (or just
/// had) a live waiter.
pub const SWEEP_MIN_AGE: Duration = Duration::from_secs(30);

/// Outcome of one sweep pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Stale `Submitted` records examined.
    pub examined: usize,
    /// Records that reached a terminal status this pass.
    pub resolved: usize,
}

/// Re-polls stale `Submitted` transactions on demand.
pub struct ReconciliationSweep {
    ledger: Arc<dyn LedgerClient>,
    transactions: Arc<dyn TransactionStore + Send + Sync>,
    tracker: ConfirmationTracker,
    min_age: Duration,
}

impl ReconciliationSweep {
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        transactions: Arc<dyn TransactionStore + Send + Sync>,
    ) -> Self {
        Self::with_min_age(ledger, transactions, SWEEP_MIN_AGE)
    }

    pub fn with_min_age(
        ledger: Arc<dyn LedgerClient>,
        transactions: Arc<dyn TransactionStore + Send + Sync>,
        min_age: Duration,
    ) -> Self {
        let tracker = ConfirmationTracker::new(ledger.clone(), transactions.clone());
        Self {
            ledger,
            transactions,
            tracker,
            min_age,
        }
    }

    /// Examine every stale `Submitted` record once.
    ///
    /// Still-absent transactions are left for the next pass; transport
    /// errors are logged and skipped rather than failing the whole sweep.
    pub async fn run_once(&self, now: Timestamp) -> Result<SweepReport, RelayError> {
        let min_age_secs = self.min_age.as_secs();
        let mut report = SweepReport::default();

        for record in self.transactions.iter_submitted()? {
            if !record.created_at().has_expired(min_age_secs, now) {
                continue;
            }
            report.examined += 1;

            match self.ledger.get_transaction_by_hash(&record.hash).await {
                Ok(TxLookup::Included(included)) => {
                    let status = self.tracker.record_inclusion(&record.hash, &included)?;
                    if status.is_terminal() {
                        report.resolved += 1;
                    }
                }
                Ok(TxLookup::NotFound) => {}
                Err(e) => {
                    tracing::warn!(hash = %record.hash, "sweep poll failed: {e}");
                }
            }
        }

        if report.examined > 0 {
            tracing::info!(
                examined = report.examined,
                resolved = report.resolved,
                "reconciliation sweep pass complete"
            );
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcel_ledger::IncludedTx;
    use parcel_nullables::{NullLedger, NullStore};
    use parcel_store::TrackedTransaction;
    use parcel_types::{TxHash, TxKind, TxStatus};

    fn submitted_at(store: &NullStore, byte: u8, secs: u64) -> TxHash {
        let hash = TxHash::new([byte; 32]);
        let record = TrackedTransaction::submitted(hash, TxKind::SendFunds, Timestamp::new(secs));
        store.put_transaction(&record).unwrap();
        hash
    }

    #[tokio::test]
    async fn resolves_included_stale_records() {
        let ledger = Arc::new(NullLedger::new());
        let store = Arc::new(NullStore::new());
        let stale = submitted_at(&store, 1, 100);
        ledger.script_lookup(
            stale,
            vec![TxLookup::Included(IncludedTx {
                code: 0,
                raw_log: String::new(),
                events: Vec::new(),
                height: 9,
            })],
        );

        let sweep = ReconciliationSweep::new(ledger, store.clone());
        let report = sweep.run_once(Timestamp::new(200)).await.unwrap();

        assert_eq!(report, SweepReport { examined: 1, resolved: 1 });
        assert_eq!(
            store.get_transaction(&stale).unwrap().status,
            TxStatus::Confirmed
        );
    }

    #[tokio::test]
    async fn fresh_records_are_skipped() {
        let ledger = Arc::new(NullLedger::new());
        let store = Arc::new(NullStore::new());
        submitted_at(&store, 1, 100);

        let sweep = ReconciliationSweep::new(ledger, store.clone());
        // Only 10 seconds old — younger than the 30 second cutoff.
        let report = sweep.run_once(Timestamp::new(110)).await.unwrap();
        assert_eq!(report, SweepReport::default());
    }

    #[tokio::test]
    async fn still_absent_records_stay_submitted() {
        let ledger = Arc::new(NullLedger::new());
        let store = Arc::new(NullStore::new());
        let stale = submitted_at(&store, 1, 100);

        let sweep = ReconciliationSweep::new(ledger, store.clone());
        let report = sweep.run_once(Timestamp::new(200)).await.unwrap();

        assert_eq!(report, SweepReport { examined: 1, resolved: 0 });
        assert_eq!(
            store.get_transaction(&stale).unwrap().status,
            TxStatus::Submitted
        );
    }
}
