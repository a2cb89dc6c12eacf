//! Signing and broadcasting ledger messages.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use parcel_keys::Keyring;
use parcel_ledger::LedgerClient;
use parcel_messages::{LedgerMsg, SignDoc, SignedTx};
use parcel_store::{TrackedTransaction, TransactionStore};
use parcel_types::{LedgerAddress, Timestamp, TxHash};

use crate::error::RelayError;

/// Builds, signs, and submits ledger transactions, recording each submission
/// in the tracked-transaction log.
///
/// The fetch-sequence → sign → submit region is serialized per signer
/// address: two concurrent submissions by the same identity would otherwise
/// race on the sequence number and one would be rejected by the ledger.
pub struct Broadcaster {
    ledger: Arc<dyn LedgerClient>,
    keyring: Arc<dyn Keyring>,
    transactions: Arc<dyn TransactionStore + Send + Sync>,
    sequence_guards: Mutex<HashMap<LedgerAddress, Arc<Mutex<()>>>>,
}

impl Broadcaster {
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        keyring: Arc<dyn Keyring>,
        transactions: Arc<dyn TransactionStore + Send + Sync>,
    ) -> Self {
        Self {
            ledger,
            keyring,
            transactions,
            sequence_guards: Mutex::new(HashMap::new()),
        }
    }

    /// Sign `msg` as `signer` and submit it for synchronous validity
    /// checking.
    ///
    /// On acceptance, persists a `Submitted` record and returns the hash for
    /// the caller to hand to the confirmation tracker. On check-time
    /// rejection (non-zero code), persists a single `Failed` event and
    /// returns [`RelayError::Rejected`] — the caller must resubmit with
    /// corrected input; the relay never retries.
    pub async fn submit(&self, signer: &str, msg: LedgerMsg) -> Result<TxHash, RelayError> {
        msg.validate()?;
        let kind = msg.kind();
        let address = self.keyring.address_of(signer)?;

        let guard = self.sequence_guard(&address).await;
        let _serialized = guard.lock().await;

        // Sequence is fetched fresh inside the lock, never cached.
        let account = self.ledger.get_account(&address).await?;
        let doc = SignDoc::new(account.account_number, account.sequence, msg);
        let signature = self.keyring.sign(signer, &doc.sign_bytes()?)?;
        let tx = SignedTx {
            doc,
            signer: address.clone(),
            signature,
        };

        let outcome = self.ledger.check_and_submit(&tx.encode()?).await?;
        let now = Timestamp::now();

        if !outcome.accepted() {
            tracing::warn!(
                signer,
                %kind,
                hash = %outcome.hash,
                code = outcome.code,
                "submission rejected at check time: {}",
                outcome.raw_log
            );
            let record = TrackedTransaction::rejected(
                outcome.hash,
                kind,
                outcome.code,
                outcome.raw_log.clone(),
                now,
            );
            self.transactions.put_transaction(&record)?;
            return Err(RelayError::Rejected {
                code: outcome.code,
                raw_log: outcome.raw_log,
            });
        }

        let record = TrackedTransaction::submitted(outcome.hash, kind, now);
        self.transactions.put_transaction(&record)?;
        tracing::debug!(signer, %kind, hash = %outcome.hash, "submission accepted");
        Ok(outcome.hash)
    }

    async fn sequence_guard(&self, address: &LedgerAddress) -> Arc<Mutex<()>> {
        let mut guards = self.sequence_guards.lock().await;
        guards
            .entry(address.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcel_keys::{keypair_from_seed, LocalKeyring};
    use parcel_messages::SendFunds;
    use parcel_nullables::{NullLedger, NullStore};
    use parcel_types::TxStatus;

    fn keyring_with(names: &[(&str, u8)]) -> Arc<LocalKeyring> {
        let ring = LocalKeyring::new();
        for (name, seed) in names {
            ring.insert(*name, keypair_from_seed(&[*seed; 32]));
        }
        Arc::new(ring)
    }

    fn send_msg(keyring: &LocalKeyring, from: &str, amount: u128) -> LedgerMsg {
        LedgerMsg::SendFunds(SendFunds {
            from: keyring.address_of(from).unwrap(),
            to: LedgerAddress::new("parc_receiver"),
            amount,
            denom: "uparc".into(),
        })
    }

    #[tokio::test]
    async fn accepted_submission_is_tracked_as_submitted() {
        let ledger = Arc::new(NullLedger::new());
        let keyring = keyring_with(&[("alice", 1)]);
        let store = Arc::new(NullStore::new());
        let broadcaster = Broadcaster::new(ledger.clone(), keyring.clone(), store.clone());

        let hash = broadcaster
            .submit("alice", send_msg(&keyring, "alice", 100))
            .await
            .unwrap();

        let record = store.get_transaction(&hash).unwrap();
        assert_eq!(record.status, TxStatus::Submitted);
        assert_eq!(record.events.len(), 1);
    }

    #[tokio::test]
    async fn rejection_records_single_failed_event() {
        let ledger = Arc::new(NullLedger::new());
        let keyring = keyring_with(&[("alice", 1)]);
        let store = Arc::new(NullStore::new());
        let broadcaster = Broadcaster::new(ledger.clone(), keyring.clone(), store.clone());

        ledger.reject_next(13, "insufficient fee");
        let err = broadcaster
            .submit("alice", send_msg(&keyring, "alice", 100))
            .await
            .unwrap_err();

        assert!(matches!(err, RelayError::Rejected { code: 13, .. }));
        let records = store.iter_transactions().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, TxStatus::Failed);
        assert_eq!(records[0].events.len(), 1);
        assert_eq!(records[0].events[0].code, 13);
    }

    #[tokio::test]
    async fn invalid_message_never_reaches_ledger() {
        let ledger = Arc::new(NullLedger::new());
        let keyring = keyring_with(&[("alice", 1)]);
        let store = Arc::new(NullStore::new());
        let broadcaster = Broadcaster::new(ledger.clone(), keyring.clone(), store.clone());

        let err = broadcaster
            .submit("alice", send_msg(&keyring, "alice", 0))
            .await
            .unwrap_err();

        assert!(matches!(err, RelayError::Msg(_)));
        assert!(ledger.submissions().is_empty());
        assert_eq!(store.transaction_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn concurrent_submissions_use_distinct_sequences() {
        let ledger = Arc::new(NullLedger::new());
        let keyring = keyring_with(&[("alice", 1)]);
        let store = Arc::new(NullStore::new());
        let broadcaster = Arc::new(Broadcaster::new(
            ledger.clone(),
            keyring.clone(),
            store.clone(),
        ));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let b = broadcaster.clone();
            let msg = send_msg(&keyring, "alice", 100);
            handles.push(tokio::spawn(async move { b.submit("alice", msg).await }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let mut sequences: Vec<u64> = ledger
            .submissions()
            .iter()
            .map(|tx| tx.doc.sequence)
            .collect();
        sequences.sort_unstable();
        assert_eq!(sequences, vec![0, 1, 2, 3]);
    }
}
