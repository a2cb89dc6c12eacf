//! Mortgage workflow engine.
//!
//! The off-chain half of the mortgage lifecycle: borrowers file requests,
//! lenders approve them by creating the mortgage on the ledger (optionally
//! chaining the purchased-share transfer), and borrowers repay until the
//! outstanding amount reaches zero — at which point the collateral marker
//! is minted, moved to the module, and burned to release the collateral.

pub mod engine;
pub mod error;
pub mod marker;

pub use engine::{CreateOutcome, MortgageEngine, RepayOutcome};
pub use error::MortgageError;
pub use marker::marker_denom;
