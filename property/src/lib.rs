//! Property workflows for the Parcel gateway.
//!
//! - [`OffPlanEngine`] — the crowdfunding state machine: developers submit
//!   properties, investors fund them incrementally, and the regulator
//!   registers a fully funded property on the ledger.
//! - [`TransferEngine`] — direct property operations (register, transfer
//!   shares, edit metadata) plus the resale-listing bookkeeping that follows
//!   every confirmed transfer.
//! - [`allocation`] — proportional share assignment with the documented
//!   rounding policy.

pub mod allocation;
pub mod error;
pub mod offplan;
pub mod transfer;

pub use allocation::{allocate_shares, percent_bps};
pub use error::PropertyError;
pub use offplan::OffPlanEngine;
pub use transfer::TransferEngine;
