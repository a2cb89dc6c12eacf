//! Identity management for the Parcel gateway.
//!
//! - [`UserRegistry`] — registered users and their one-directional role
//!   promotions.
//! - [`KycEngine`] — the identity-verification request/approval workflow
//!   that gates the `User → Investor` promotion.
//! - [`SessionTable`] — opaque login tokens resolved per call.

pub mod error;
pub mod kyc;
pub mod registry;
pub mod session;

pub use error::IdentityError;
pub use kyc::KycEngine;
pub use registry::UserRegistry;
pub use session::SessionTable;
