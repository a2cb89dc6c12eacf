//! LMDB implementation of ListingStore.

use parcel_store::{ForSaleListing, ListingStore, StoreError};

use crate::store::LmdbStore;

impl ListingStore for LmdbStore {
    fn get_listing(&self, id: u64) -> Result<ForSaleListing, StoreError> {
        self.get_record(
            self.env.listings_db,
            &id.to_be_bytes(),
            &format!("listing {id}"),
        )
    }

    fn put_listing(&self, listing: &ForSaleListing) -> Result<(), StoreError> {
        self.put_record(self.env.listings_db, &listing.id.to_be_bytes(), listing)
    }

    fn delete_listing(&self, id: u64) -> Result<(), StoreError> {
        self.delete_record(self.env.listings_db, &id.to_be_bytes())
    }

    fn iter_listings(&self) -> Result<Vec<ForSaleListing>, StoreError> {
        self.iter_records(self.env.listings_db)
    }

    fn next_listing_id(&self) -> Result<u64, StoreError> {
        Ok(self.env.next_counter("next_listing_id")?)
    }
}
