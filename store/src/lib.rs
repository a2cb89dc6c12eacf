//! Abstract storage traits for the Parcel gateway.
//!
//! Every durable collection (users, sessions, tracked transactions, mortgage
//! requests, off-plan properties, purchase requests, KYC requests, resale
//! listings) gets one trait here, together with the record type it stores.
//! Storage backends (LMDB, in-memory for testing) implement these traits;
//! the rest of the codebase depends only on the traits.

pub mod batch;
pub mod error;
pub mod kyc;
pub mod listings;
pub mod meta;
pub mod mortgage_requests;
pub mod properties;
pub mod purchases;
pub mod sessions;
pub mod transactions;
pub mod users;

pub use batch::OffPlanBatchStore;
pub use error::StoreError;
pub use kyc::{KycRequest, KycStatus, KycStore};
pub use listings::{ForSaleListing, ListingStore};
pub use meta::MetaStore;
pub use mortgage_requests::{
    MortgageRequest, MortgageRequestStore, MortgageTerms, PurchaseDetails, RequestStatus,
};
pub use properties::{OffPlanProperty, PropertyStatus, PropertyStore};
pub use purchases::{PurchaseRequest, PurchaseStore};
pub use sessions::{SessionRecord, SessionStore};
pub use transactions::{LifecycleEvent, TrackedTransaction, TransactionStore};
pub use users::{User, UserStore};
