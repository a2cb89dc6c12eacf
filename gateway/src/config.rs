//! Gateway configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::GatewayError;

/// Configuration for the Parcel gateway.
///
/// Can be loaded from a TOML file via [`GatewayConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the ledger node's REST endpoint.
    #[serde(default = "default_ledger_endpoint")]
    pub ledger_endpoint: String,

    /// Data directory for LMDB storage.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Port for the HTTP surface.
    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Interval between confirmation polls, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Ceiling on one confirmation wait, in milliseconds.
    #[serde(default = "default_confirm_timeout_ms")]
    pub confirm_timeout_ms: u64,

    /// Whether the reconciliation sweep runs.
    #[serde(default = "default_true")]
    pub enable_sweep: bool,

    /// Interval between sweep passes, in seconds.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    /// Whether the faucet endpoint is enabled.
    #[serde(default)]
    pub enable_faucet: bool,

    /// Amount granted per faucet request.
    #[serde(default = "default_faucet_amount")]
    pub faucet_amount: u128,

    /// Denomination used by the faucet and fund movements.
    #[serde(default = "default_denom")]
    pub denom: String,

    /// Whether the background workload simulator runs.
    #[serde(default)]
    pub enable_simulator: bool,

    /// Pacing delay between simulator actions, in milliseconds.
    #[serde(default = "default_simulator_interval_ms")]
    pub simulator_interval_ms: u64,

    /// Simulator RNG seed; the same seed replays the same traffic.
    #[serde(default)]
    pub simulator_seed: u64,

    /// Number of synthetic simulator identities.
    #[serde(default = "default_simulator_actors")]
    pub simulator_actors: usize,

    /// Directory of encrypted keystore files. When unset, the well-known
    /// identities use deterministic development seeds.
    #[serde(default)]
    pub keystore_dir: Option<PathBuf>,

    /// Password for the keystore files (dev setups may inline it; real
    /// deployments should use the PARCEL_KEYSTORE_PASSWORD env var).
    #[serde(default)]
    pub keystore_password: Option<String>,

    /// Interval between metrics gauge samples, in seconds.
    #[serde(default = "default_metrics_interval_secs")]
    pub metrics_interval_secs: u64,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_ledger_endpoint() -> String {
    "http://localhost:1317".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./parcel_data")
}

fn default_rpc_port() -> u16 {
    8080
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_poll_interval_ms() -> u64 {
    2_000
}

fn default_confirm_timeout_ms() -> u64 {
    30_000
}

fn default_true() -> bool {
    true
}

fn default_sweep_interval_secs() -> u64 {
    60
}

fn default_faucet_amount() -> u128 {
    1_000_000
}

fn default_denom() -> String {
    "uparc".to_string()
}

fn default_simulator_interval_ms() -> u64 {
    5_000
}

fn default_simulator_actors() -> usize {
    4
}

fn default_metrics_interval_secs() -> u64 {
    15
}

// ── Impl ───────────────────────────────────────────────────────────────

impl GatewayConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, GatewayError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| GatewayError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, GatewayError> {
        toml::from_str(s).map_err(|e| GatewayError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("GatewayConfig is always serializable to TOML")
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::from_toml_str("").expect("defaults always parse")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = GatewayConfig::default();
        let toml_str = config.to_toml_string();
        let parsed = GatewayConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed.rpc_port, config.rpc_port);
        assert_eq!(parsed.poll_interval_ms, config.poll_interval_ms);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = GatewayConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.rpc_port, 8080);
        assert_eq!(config.poll_interval_ms, 2_000);
        assert_eq!(config.confirm_timeout_ms, 30_000);
        assert!(config.enable_sweep);
        assert!(!config.enable_faucet);
        assert!(!config.enable_simulator);
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            rpc_port = 9999
            enable_faucet = true
            confirm_timeout_ms = 10000
        "#;
        let config = GatewayConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.rpc_port, 9999);
        assert!(config.enable_faucet);
        assert_eq!(config.confirm_timeout_ms, 10_000);
        assert_eq!(config.log_format, "human"); // default
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = GatewayConfig::from_toml_file("/nonexistent/parcel.toml");
        assert!(matches!(result, Err(GatewayError::Config(_))));
    }
}
