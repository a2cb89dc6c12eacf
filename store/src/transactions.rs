//! Tracked-transaction storage trait and lifecycle records.

use crate::StoreError;
use parcel_types::{ChainEvent, Timestamp, TxHash, TxKind, TxStatus};
use serde::{Deserialize, Serialize};

/// One entry in a transaction's append-only lifecycle log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleEvent {
    pub status: TxStatus,
    pub timestamp: Timestamp,
    /// Ledger result code (zero = success). Zero for the submitted event.
    pub code: u32,
    /// Raw diagnostic text from the ledger, if any.
    pub raw_log: String,
    /// Chain-emitted events attached on confirmation.
    pub chain_events: Vec<ChainEvent>,
}

/// A transaction the gateway has submitted and tracks to a terminal outcome.
///
/// Created on submission, mutated only by appending lifecycle events and
/// updating `status`, never deleted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedTransaction {
    pub hash: TxHash,
    pub kind: TxKind,
    pub status: TxStatus,
    pub events: Vec<LifecycleEvent>,
}

impl TrackedTransaction {
    /// Create a record in the `Submitted` state with its first event.
    pub fn submitted(hash: TxHash, kind: TxKind, now: Timestamp) -> Self {
        Self {
            hash,
            kind,
            status: TxStatus::Submitted,
            events: vec![LifecycleEvent {
                status: TxStatus::Submitted,
                timestamp: now,
                code: 0,
                raw_log: String::new(),
                chain_events: Vec::new(),
            }],
        }
    }

    /// Create a record that failed validity checking, with its single
    /// terminal event.
    pub fn rejected(hash: TxHash, kind: TxKind, code: u32, raw_log: String, now: Timestamp) -> Self {
        Self {
            hash,
            kind,
            status: TxStatus::Failed,
            events: vec![LifecycleEvent {
                status: TxStatus::Failed,
                timestamp: now,
                code,
                raw_log,
                chain_events: Vec::new(),
            }],
        }
    }

    /// Append a lifecycle event and update the current status.
    ///
    /// Appending is idempotent with respect to terminal outcomes: once the
    /// record holds a terminal event, further appends are ignored. A
    /// duplicate `Submitted` event is likewise dropped.
    pub fn append_event(&mut self, event: LifecycleEvent) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        if event.status == TxStatus::Submitted
            && self.events.iter().any(|e| e.status == TxStatus::Submitted)
        {
            return false;
        }
        self.status = event.status;
        self.events.push(event);
        true
    }

    /// Timestamp of the first lifecycle event.
    pub fn created_at(&self) -> Timestamp {
        self.events
            .first()
            .map(|e| e.timestamp)
            .unwrap_or(Timestamp::EPOCH)
    }
}

/// Trait for tracked-transaction storage.
pub trait TransactionStore {
    fn get_transaction(&self, hash: &TxHash) -> Result<TrackedTransaction, StoreError>;
    fn put_transaction(&self, tx: &TrackedTransaction) -> Result<(), StoreError>;
    fn exists(&self, hash: &TxHash) -> Result<bool, StoreError>;
    fn iter_transactions(&self) -> Result<Vec<TrackedTransaction>, StoreError>;
    fn transaction_count(&self) -> Result<u64, StoreError>;

    /// All transactions still in the `Submitted` state (for the sweep).
    fn iter_submitted(&self) -> Result<Vec<TrackedTransaction>, StoreError> {
        Ok(self
            .iter_transactions()?
            .into_iter()
            .filter(|t| t.status == TxStatus::Submitted)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(byte: u8) -> TxHash {
        TxHash::new([byte; 32])
    }

    fn event(status: TxStatus, secs: u64) -> LifecycleEvent {
        LifecycleEvent {
            status,
            timestamp: Timestamp::new(secs),
            code: 0,
            raw_log: String::new(),
            chain_events: Vec::new(),
        }
    }

    #[test]
    fn submitted_then_confirmed() {
        let mut tx = TrackedTransaction::submitted(hash(1), TxKind::SendFunds, Timestamp::new(10));
        assert!(tx.append_event(event(TxStatus::Confirmed, 20)));
        assert_eq!(tx.status, TxStatus::Confirmed);
        assert_eq!(tx.events.len(), 2);
    }

    #[test]
    fn duplicate_submitted_dropped() {
        let mut tx = TrackedTransaction::submitted(hash(1), TxKind::SendFunds, Timestamp::new(10));
        assert!(!tx.append_event(event(TxStatus::Submitted, 11)));
        assert_eq!(tx.events.len(), 1);
    }

    #[test]
    fn terminal_is_final() {
        let mut tx = TrackedTransaction::submitted(hash(1), TxKind::SendFunds, Timestamp::new(10));
        assert!(tx.append_event(event(TxStatus::Failed, 20)));
        assert!(!tx.append_event(event(TxStatus::Confirmed, 30)));
        assert_eq!(tx.status, TxStatus::Failed);
        assert_eq!(tx.events.len(), 2);
    }

    #[test]
    fn rejected_record_is_terminal() {
        let tx = TrackedTransaction::rejected(
            hash(2),
            TxKind::CreateMortgage,
            5,
            "insufficient fee".into(),
            Timestamp::new(10),
        );
        assert_eq!(tx.status, TxStatus::Failed);
        assert_eq!(tx.events.len(), 1);
        assert_eq!(tx.events[0].code, 5);
    }
}
