//! Synthetic workload driver.
//!
//! Generates randomized registration / transfer / metadata-edit traffic
//! through the public workflow engines, for load and regression testing.
//! Everything is seeded: the same seed replays the same traffic.

pub mod driver;
pub mod partition;

pub use driver::{SimulatorConfig, WorkloadDriver};
pub use partition::{partition, partition_percent};
