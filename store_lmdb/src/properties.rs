//! LMDB implementation of PropertyStore.

use parcel_store::{OffPlanProperty, PropertyStore, StoreError};

use crate::store::LmdbStore;

impl PropertyStore for LmdbStore {
    fn get_property(&self, id: u64) -> Result<OffPlanProperty, StoreError> {
        self.get_record(
            self.env.properties_db,
            &id.to_be_bytes(),
            &format!("property {id}"),
        )
    }

    fn put_property(&self, property: &OffPlanProperty) -> Result<(), StoreError> {
        self.put_record(self.env.properties_db, &property.id.to_be_bytes(), property)
    }

    fn iter_properties(&self) -> Result<Vec<OffPlanProperty>, StoreError> {
        self.iter_records(self.env.properties_db)
    }

    fn next_property_id(&self) -> Result<u64, StoreError> {
        Ok(self.env.next_counter("next_property_id")?)
    }
}
