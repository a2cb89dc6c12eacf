//! Nullable infrastructure for deterministic testing.
//!
//! Real collaborators are replaced by in-memory doubles whose behavior is
//! fully controlled by the test: a clock that only advances when told to, a
//! ledger that follows a script, and a store that never touches disk.

pub mod clock;
pub mod ledger;
pub mod store;

pub use clock::NullClock;
pub use ledger::NullLedger;
pub use store::NullStore;
