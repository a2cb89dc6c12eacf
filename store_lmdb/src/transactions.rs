//! LMDB implementation of TransactionStore.

use parcel_store::{StoreError, TrackedTransaction, TransactionStore};
use parcel_types::TxHash;

use crate::store::LmdbStore;

impl TransactionStore for LmdbStore {
    fn get_transaction(&self, hash: &TxHash) -> Result<TrackedTransaction, StoreError> {
        self.get_record(
            self.env.transactions_db,
            hash.as_bytes(),
            &format!("transaction {hash}"),
        )
    }

    fn put_transaction(&self, tx: &TrackedTransaction) -> Result<(), StoreError> {
        self.put_record(self.env.transactions_db, tx.hash.as_bytes(), tx)
    }

    fn exists(&self, hash: &TxHash) -> Result<bool, StoreError> {
        self.exists_record(self.env.transactions_db, hash.as_bytes())
    }

    fn iter_transactions(&self) -> Result<Vec<TrackedTransaction>, StoreError> {
        self.iter_records(self.env.transactions_db)
    }

    fn transaction_count(&self) -> Result<u64, StoreError> {
        self.count_records(self.env.transactions_db)
    }
}
