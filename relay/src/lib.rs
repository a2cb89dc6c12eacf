//! Transaction relay for the Parcel gateway.
//!
//! The relay turns a ledger message into a signed, submitted, and tracked
//! transaction:
//!
//! 1. [`Broadcaster::submit`] resolves the signer's account sequence, signs,
//!    and submits for synchronous validity checking.
//! 2. [`ConfirmationTracker::await_confirmation`] polls the ledger until the
//!    transaction is included (or the wait times out), appending lifecycle
//!    events to the persisted [`parcel_store::TrackedTransaction`] record.
//! 3. [`ReconciliationSweep`] re-polls transactions a timed-out wait left
//!    behind, so the log converges without operator action.

pub mod broadcaster;
pub mod error;
pub mod sweep;
pub mod tracker;

pub use broadcaster::Broadcaster;
pub use error::RelayError;
pub use sweep::{ReconciliationSweep, SweepReport};
pub use tracker::ConfirmationTracker;
