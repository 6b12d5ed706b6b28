//! Curia daemon — entry point for running the moderation host.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use curia_rpc::RpcServer;
use curia_service::{
    init_logging, spawn_sweeper, LogFormat, ModerationHub, ServiceConfig, ShutdownController,
    TracingSink,
};
use curia_store::MemorySessionStore;

#[derive(Parser)]
#[command(name = "curia-daemon", about = "Curia stake-weighted moderation host")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings are
    /// used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,

    /// HTTP API port.
    #[arg(long, env = "CURIA_RPC_PORT")]
    rpc_port: Option<u16>,

    /// Disable the HTTP API.
    #[arg(long, env = "CURIA_DISABLE_RPC")]
    disable_rpc: bool,

    /// Window-expiry sweep interval in milliseconds.
    #[arg(long, env = "CURIA_REFRESH_INTERVAL_MS")]
    refresh_interval_ms: Option<u64>,

    /// Maximum concurrent open sessions.
    #[arg(long, env = "CURIA_MAX_SESSIONS")]
    max_sessions: Option<usize>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "CURIA_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "CURIA_LOG_FORMAT")]
    log_format: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            let path = path.to_string_lossy();
            ServiceConfig::from_toml_file(&path)?
        }
        None => ServiceConfig::default(),
    };
    if let Some(port) = cli.rpc_port {
        config.rpc_port = port;
    }
    if cli.disable_rpc {
        config.enable_rpc = false;
    }
    if let Some(interval) = cli.refresh_interval_ms {
        config.refresh_interval_ms = interval;
    }
    if let Some(max) = cli.max_sessions {
        config.max_sessions = max;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }

    init_logging(LogFormat::from_config(&config.log_format), &config.log_level);

    // Fail fast on a bad staking configuration before anything starts.
    let settings = config.session_settings();
    settings.validate()?;

    tracing::info!(
        rpc = if config.enable_rpc {
            config.rpc_port.to_string()
        } else {
            "off".into()
        },
        refresh_interval_ms = config.refresh_interval_ms,
        max_sessions = config.max_sessions,
        "starting Curia moderation host"
    );

    let store = Arc::new(MemorySessionStore::new());
    let sink = Arc::new(TracingSink::new());
    let hub = Arc::new(ModerationHub::new(
        settings,
        config.max_sessions,
        store,
        sink,
    ));
    let restored = hub.restore().await?;
    if restored > 0 {
        tracing::info!(count = restored, "resumed open sessions");
    }

    let shutdown = Arc::new(ShutdownController::new());
    let sweeper = spawn_sweeper(hub.clone(), config.refresh_interval_ms, &shutdown);

    let rpc_handle = if config.enable_rpc {
        let hub = hub.clone();
        let shutdown = shutdown.clone();
        let port = config.rpc_port;
        Some(tokio::spawn(async move {
            if let Err(e) = RpcServer::new(port).start(hub, &shutdown).await {
                tracing::error!(error = %e, "HTTP API terminated");
            }
        }))
    } else {
        None
    };

    shutdown.wait_for_signal().await;

    sweeper.await?;
    if let Some(handle) = rpc_handle {
        handle.await?;
    }
    tracing::info!("Curia daemon exited cleanly");
    Ok(())
}
