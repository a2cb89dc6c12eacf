//! LMDB implementation of SessionStore.

use parcel_store::{SessionRecord, SessionStore, StoreError};

use crate::store::LmdbStore;

impl SessionStore for LmdbStore {
    fn get_session(&self, token: &str) -> Result<SessionRecord, StoreError> {
        self.get_record(self.env.sessions_db, token.as_bytes(), "session")
    }

    fn put_session(&self, session: &SessionRecord) -> Result<(), StoreError> {
        self.put_record(self.env.sessions_db, session.token.as_bytes(), session)
    }

    fn delete_session(&self, token: &str) -> Result<(), StoreError> {
        self.delete_record(self.env.sessions_db, token.as_bytes())
    }

    fn iter_sessions(&self) -> Result<Vec<SessionRecord>, StoreError> {
        self.iter_records(self.env.sessions_db)
    }
}
