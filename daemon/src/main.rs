//! Parcel daemon — entry point for running the gateway.

use clap::Parser;
use std::path::PathBuf;

use parcel_gateway::{init_logging, Gateway, GatewayConfig, LogFormat};

#[derive(Parser)]
#[command(name = "parcel-daemon", about = "Parcel ledger gateway daemon")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings are
    /// used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base URL of the ledger node's REST endpoint.
    #[arg(long, env = "PARCEL_LEDGER_ENDPOINT")]
    ledger_endpoint: Option<String>,

    /// Data directory for LMDB storage.
    #[arg(long, env = "PARCEL_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// HTTP port.
    #[arg(long, env = "PARCEL_RPC_PORT")]
    rpc_port: Option<u16>,

    /// Enable the faucet endpoint.
    #[arg(long, env = "PARCEL_ENABLE_FAUCET")]
    faucet: bool,

    /// Enable the background workload simulator.
    #[arg(long, env = "PARCEL_ENABLE_SIMULATOR")]
    simulator: bool,

    /// Password for the keystore directory.
    #[arg(long, env = "PARCEL_KEYSTORE_PASSWORD", hide_env_values = true)]
    keystore_password: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "info", env = "PARCEL_LOG_LEVEL")]
    log_level: String,

    /// Log format: "human" or "json".
    #[arg(long, env = "PARCEL_LOG_FORMAT")]
    log_format: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => GatewayConfig::from_toml_file(
            path.to_str()
                .ok_or_else(|| anyhow::anyhow!("non-UTF8 config path"))?,
        )?,
        None => GatewayConfig::default(),
    };

    // CLI flags and env vars override the file.
    if let Some(endpoint) = cli.ledger_endpoint {
        config.ledger_endpoint = endpoint;
    }
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(port) = cli.rpc_port {
        config.rpc_port = port;
    }
    if cli.faucet {
        config.enable_faucet = true;
    }
    if cli.simulator {
        config.enable_simulator = true;
    }
    if let Some(password) = cli.keystore_password {
        config.keystore_password = Some(password);
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    config.log_level = cli.log_level;

    init_logging(LogFormat::from_config(&config.log_format), &config.log_level);

    tracing::info!(
        ledger = %config.ledger_endpoint,
        rpc_port = config.rpc_port,
        data_dir = %config.data_dir.display(),
        "starting parcel gateway"
    );

    let mut gateway = Gateway::new(config)?;
    gateway.start()?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received — stopping gateway");
    gateway.stop().await;

    tracing::info!("parcel daemon exited cleanly");
    Ok(())
}
