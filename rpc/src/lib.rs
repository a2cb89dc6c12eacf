//! HTTP surface for the Parcel gateway.
//!
//! One resource per workflow operation: property registration / transfer /
//! metadata edits, mortgage request / create / repay, the faucet, login and
//! logout, KYC request / approve / reject, off-plan submit / purchase /
//! approve / list, and the tracked-transaction log (paginated list, detail,
//! and lifecycle events by hash). Plus `/health` and Prometheus `/metrics`.

pub mod error;
pub mod handlers;
pub mod pagination;
pub mod server;
pub mod state;

pub use error::RpcError;
pub use server::{build_router, serve};
pub use state::{FaucetConfig, RpcState};
