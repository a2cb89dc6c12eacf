//! Nullable ledger — a scriptable in-memory double of the ledger node.
//!
//! Behaves like a ledger that includes every accepted transaction
//! immediately, with two knobs for tests:
//! - `reject_next` makes the next submission fail validity checking;
//! - `script_lookup` queues per-hash lookup results (e.g. two `NotFound`s
//!   before the inclusion) consumed one per poll.
//!
//! Submitted transactions are decoded and mortgage messages are applied to
//! the in-memory aggregates, so repayment flows observe real balance
//! movement without a chain.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use parcel_keys::hash_message;
use parcel_ledger::{
    AccountRecord, IncludedTx, LedgerClient, LedgerError, MortgageRecord, MortgageStatus,
    SubmitOutcome, TxLookup,
};
use parcel_messages::{LedgerMsg, SignedTx};
use parcel_types::{LedgerAddress, TxHash};

#[derive(Default)]
struct Inner {
    accounts: HashMap<LedgerAddress, AccountRecord>,
    mortgages: HashMap<u64, MortgageRecord>,
    next_mortgage_id: u64,
    /// Queued lookup results per hash; when empty, lookups fall through to
    /// the included transactions map.
    scripted_lookups: HashMap<TxHash, VecDeque<TxLookup>>,
    included: HashMap<TxHash, IncludedTx>,
    pending_rejection: Option<(u32, String)>,
    submissions: Vec<SignedTx>,
    minted_markers: Vec<String>,
    burned_markers: Vec<String>,
}

/// A deterministic in-memory [`LedgerClient`].
#[derive(Default)]
pub struct NullLedger {
    inner: Mutex<Inner>,
}

impl NullLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue lookup results for a hash, consumed one per poll.
    pub fn script_lookup(&self, hash: TxHash, results: Vec<TxLookup>) {
        self.inner
            .lock()
            .unwrap()
            .scripted_lookups
            .insert(hash, results.into());
    }

    /// Make the next submission fail validity checking with this code.
    pub fn reject_next(&self, code: u32, raw_log: impl Into<String>) {
        self.inner.lock().unwrap().pending_rejection = Some((code, raw_log.into()));
    }

    /// Seed an on-ledger mortgage aggregate.
    pub fn set_mortgage(&self, record: MortgageRecord) {
        let mut inner = self.inner.lock().unwrap();
        inner.next_mortgage_id = inner.next_mortgage_id.max(record.id);
        inner.mortgages.insert(record.id, record);
    }

    /// Read back a mortgage aggregate.
    pub fn mortgage(&self, id: u64) -> Option<MortgageRecord> {
        self.inner.lock().unwrap().mortgages.get(&id).cloned()
    }

    /// Every transaction that passed validity checking, in order.
    pub fn submissions(&self) -> Vec<SignedTx> {
        self.inner.lock().unwrap().submissions.clone()
    }

    /// Denoms burned via marker messages, in order.
    pub fn burned_markers(&self) -> Vec<String> {
        self.inner.lock().unwrap().burned_markers.clone()
    }

    /// Denoms minted via marker messages, in order.
    pub fn minted_markers(&self) -> Vec<String> {
        self.inner.lock().unwrap().minted_markers.clone()
    }

    /// Current sequence for an address (0 if never seen).
    pub fn sequence_of(&self, address: &LedgerAddress) -> u64 {
        self.inner
            .lock()
            .unwrap()
            .accounts
            .get(address)
            .map(|a| a.sequence)
            .unwrap_or(0)
    }
}

impl Inner {
    fn account_entry(&mut self, address: &LedgerAddress) -> &mut AccountRecord {
        let next_number = self.accounts.len() as u64 + 1;
        self.accounts
            .entry(address.clone())
            .or_insert_with(|| AccountRecord {
                address: address.clone(),
                account_number: next_number,
                sequence: 0,
            })
    }

    /// Apply a message's ledger-side effects to the in-memory aggregates.
    fn apply(&mut self, msg: &LedgerMsg) -> (u32, String) {
        match msg {
            LedgerMsg::CreateMortgage(m) => {
                self.next_mortgage_id += 1;
                let id = self.next_mortgage_id;
                self.mortgages.insert(
                    id,
                    MortgageRecord {
                        id,
                        index: id,
                        lender: m.lender.clone(),
                        lendee: m.lendee.clone(),
                        collateral: m.collateral.clone(),
                        amount: m.amount,
                        outstanding_amount: m.amount,
                        status: MortgageStatus::Approved,
                    },
                );
                (0, String::new())
            }
            LedgerMsg::RepayMortgage(m) => match self.mortgages.get_mut(&m.mortgage_id) {
                Some(record) if record.outstanding_amount >= m.amount => {
                    record.outstanding_amount -= m.amount;
                    if record.outstanding_amount == 0 {
                        record.status = MortgageStatus::Paid;
                    }
                    (0, String::new())
                }
                Some(_) => (4, "repayment exceeds outstanding amount".into()),
                None => (3, format!("unknown mortgage {}", m.mortgage_id)),
            },
            LedgerMsg::MintMarker(m) => {
                self.minted_markers.push(m.denom.clone());
                (0, String::new())
            }
            LedgerMsg::BurnMarker(m) => {
                self.burned_markers.push(m.denom.clone());
                (0, String::new())
            }
            _ => (0, String::new()),
        }
    }
}

#[async_trait]
impl LedgerClient for NullLedger {
    async fn get_account(&self, address: &LedgerAddress) -> Result<AccountRecord, LedgerError> {
        let mut inner = self.inner.lock().unwrap();
        Ok(inner.account_entry(address).clone())
    }

    async fn check_and_submit(&self, tx_bytes: &[u8]) -> Result<SubmitOutcome, LedgerError> {
        let hash = hash_message(tx_bytes);
        let mut inner = self.inner.lock().unwrap();

        if let Some((code, raw_log)) = inner.pending_rejection.take() {
            return Ok(SubmitOutcome { hash, code, raw_log });
        }

        let tx: SignedTx = bincode::deserialize(tx_bytes)
            .map_err(|e| LedgerError::BadResponse(format!("undecodable tx: {e}")))?;

        inner.account_entry(&tx.signer).sequence += 1;

        let (code, raw_log) = inner.apply(&tx.doc.msg);
        let height = inner.submissions.len() as u64 + 1;
        inner.included.insert(
            hash,
            IncludedTx {
                code,
                raw_log,
                events: Vec::new(),
                height,
            },
        );
        inner.submissions.push(tx);

        Ok(SubmitOutcome {
            hash,
            code: 0,
            raw_log: String::new(),
        })
    }

    async fn get_transaction_by_hash(&self, hash: &TxHash) -> Result<TxLookup, LedgerError> {
        let mut inner = self.inner.lock().unwrap();

        if let Some(queue) = inner.scripted_lookups.get_mut(hash) {
            if let Some(result) = queue.pop_front() {
                return Ok(result);
            }
        }

        Ok(inner
            .included
            .get(hash)
            .cloned()
            .map(TxLookup::Included)
            .unwrap_or(TxLookup::NotFound))
    }

    async fn get_mortgage(&self, id: u64) -> Result<MortgageRecord, LedgerError> {
        self.inner
            .lock()
            .unwrap()
            .mortgages
            .get(&id)
            .cloned()
            .ok_or(LedgerError::MortgageNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcel_messages::{SendFunds, SignDoc};
    use parcel_types::Signature;

    fn addr(tag: &str) -> LedgerAddress {
        LedgerAddress::new(format!("parc_{tag}"))
    }

    fn signed(msg: LedgerMsg, signer: &LedgerAddress, sequence: u64) -> Vec<u8> {
        SignedTx {
            doc: SignDoc::new(1, sequence, msg),
            signer: signer.clone(),
            signature: Signature([0u8; 64]),
        }
        .encode()
        .unwrap()
    }

    #[tokio::test]
    async fn submit_increments_sequence() {
        let ledger = NullLedger::new();
        let from = addr("a");
        let msg = LedgerMsg::SendFunds(SendFunds {
            from: from.clone(),
            to: addr("b"),
            amount: 1,
            denom: "uparc".into(),
        });

        ledger.check_and_submit(&signed(msg, &from, 0)).await.unwrap();
        assert_eq!(ledger.sequence_of(&from), 1);
    }

    #[tokio::test]
    async fn scripted_lookups_consumed_in_order() {
        let ledger = NullLedger::new();
        let hash = TxHash::new([9u8; 32]);
        ledger.script_lookup(
            hash,
            vec![
                TxLookup::NotFound,
                TxLookup::Included(IncludedTx {
                    code: 0,
                    raw_log: String::new(),
                    events: Vec::new(),
                    height: 5,
                }),
            ],
        );

        assert_eq!(
            ledger.get_transaction_by_hash(&hash).await.unwrap(),
            TxLookup::NotFound
        );
        assert!(matches!(
            ledger.get_transaction_by_hash(&hash).await.unwrap(),
            TxLookup::Included(_)
        ));
    }

    #[tokio::test]
    async fn repay_decrements_outstanding() {
        let ledger = NullLedger::new();
        let lendee = addr("lendee");
        ledger.set_mortgage(MortgageRecord {
            id: 1,
            index: 1,
            lender: addr("bank"),
            lendee: lendee.clone(),
            collateral: "deed-7".into(),
            amount: 1000,
            outstanding_amount: 1000,
            status: MortgageStatus::Approved,
        });

        let msg = LedgerMsg::RepayMortgage(parcel_messages::RepayMortgage {
            lendee: lendee.clone(),
            mortgage_id: 1,
            amount: 400,
        });
        ledger.check_and_submit(&signed(msg, &lendee, 0)).await.unwrap();

        let record = ledger.mortgage(1).unwrap();
        assert_eq!(record.outstanding_amount, 600);
        assert_eq!(record.status, MortgageStatus::Approved);
    }
}
