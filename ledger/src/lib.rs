//! Ledger client interface for the Parcel gateway.
//!
//! The ledger itself — consensus, storage, message semantics — is an external
//! collaborator. This crate defines the narrow async interface the gateway
//! consumes ([`LedgerClient`]) plus an HTTP implementation for a running
//! ledger node.

pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use client::LedgerClient;
pub use error::LedgerError;
pub use http::HttpLedgerClient;
pub use types::{AccountRecord, IncludedTx, MortgageRecord, MortgageStatus, SubmitOutcome, TxLookup};
