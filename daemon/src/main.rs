//! herdguard daemon, the entry point for running the verification service.

use anyhow::Context;
use clap::Parser;
use herdguard_node::{init_logging, HerdguardService, LogFormat, ServiceConfig, ShutdownController};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "herdguard-daemon", about = "Herder identity verification and geofencing service")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "HERDGUARD_CONFIG")]
    config: Option<PathBuf>,

    /// HTTP API port.
    #[arg(long, env = "HERDGUARD_PORT")]
    port: Option<u16>,

    /// JSON seed file with routes and demo herders.
    #[arg(long, env = "HERDGUARD_SEED")]
    seed: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "HERDGUARD_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "HERDGUARD_LOG_FORMAT")]
    log_format: Option<LogFormat>,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<ServiceConfig> {
        let mut config = match &self.config {
            Some(path) => ServiceConfig::from_toml_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => ServiceConfig::default(),
        };
        if let Some(port) = self.port {
            config.rpc_port = port;
        }
        if let Some(seed) = self.seed {
            config.seed_path = Some(seed);
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.clone();
    let config = cli.into_config()?;

    init_logging(config.log_format, &config.log_level);
    if let Some(path) = config_path {
        tracing::info!("Loaded config from {}", path.display());
    }

    let service = HerdguardService::new(config).context("failed to start service")?;

    let shutdown = Arc::new(ShutdownController::new());
    let signals = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move { shutdown.wait_for_signal().await })
    };

    service.run(&shutdown).await?;
    signals.abort();

    tracing::info!("herdguard daemon exited cleanly");
    Ok(())
}
