use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use meteo_configuration::ServerConfig;
use meteo_server::{AppState, cors_layer, router};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info,meteo=debug";

/// Current-weather proxy for OpenWeatherMap.
#[derive(Debug, Parser)]
#[command(name = "meteo", version, about)]
struct Cli {
    /// YAML configuration file.
    #[arg(short, long, env = "METEO_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind, overrides the configuration.
    #[arg(short, long)]
    listen: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config =
        ServerConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(listen) = cli.listen {
        config.listen = listen;
    }
    config.validate().context("invalid configuration")?;

    let cors = cors_layer(&config.cors)?;
    let client = config
        .upstream
        .clone()
        .into_client(None)
        .context("failed to build upstream client")?;
    info!(
        endpoint = %client.endpoint(),
        timeout = ?client.timeout(),
        "upstream configured"
    );

    let app = router(AppState::new(client)).layer(cors);

    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("failed to bind {}", config.listen))?;
    info!(addr = %listener.local_addr()?, "meteo listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("meteo stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
