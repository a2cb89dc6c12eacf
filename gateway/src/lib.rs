//! The Parcel gateway.
//!
//! Wires every subsystem together: LMDB storage, the keyring, the ledger
//! client, the relay, the workflow engines, the HTTP surface, and the
//! background tasks (reconciliation sweep, metrics sampler, workload
//! simulator).

pub mod config;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod metrics;
pub mod seed;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use gateway::Gateway;
pub use logging::{init_logging, LogFormat};
pub use metrics::GatewayMetrics;
