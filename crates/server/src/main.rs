use anyhow::Result;
use axum::serve;
use clap::Parser;
use patroneos_core::config::{ConfigStore, Mode, RuntimeSettings};
use server::{build_app, logging::init_logging};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tokio::signal;
use tracing::{debug, error, info};

/// RPC gateway for nodeos: filters transactions before they reach the node and relays
/// outcomes to fail2ban.
#[derive(Debug, Parser)]
#[command(name = "patroneos", version)]
struct Args {
    /// Path to the JSON configuration file.
    #[arg(long = "config-file", alias = "configFile", default_value = "./config.json")]
    config_file: PathBuf,

    /// Role of this process: `filter` or `fail2ban-relay`. Overrides `PATRONEOS__MODE`.
    #[arg(long)]
    mode: Option<Mode>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = RuntimeSettings::load()
        .map_err(|e| anyhow::anyhow!("Runtime settings validation failed: {e}"))?;
    if let Some(mode) = args.mode {
        settings.mode = mode;
    }

    init_logging(&settings.logging);
    info!(mode = %settings.mode, "Starting Patroneos");

    let store = Arc::new(ConfigStore::load(&args.config_file, settings.mode).map_err(|e| {
        error!(error = %e, path = %args.config_file.display(), "Configuration load failed");
        anyhow::anyhow!("Configuration load failed: {e}")
    })?);

    let config = store.snapshot();
    debug!(
        nodeos = %config.upstream_base_url(),
        relay_endpoints = config.log_endpoints.len(),
        blacklisted_contracts = config.contract_black_list.len(),
        "Configuration loaded"
    );

    // The listen port and the relay log location are read once; changing either through the
    // config API takes effect on the next start.
    let addr = config.listen_addr()?;
    let app = build_app(&settings, store).await?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %addr, mode = %settings.mode, "Patroneos listening");

    if let Err(e) = serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "Server error occurred");
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C, or on SIGTERM where the platform has it. A listener that cannot be
/// installed never fires, leaving the other one in charge.
async fn shutdown_signal() {
    let reason = tokio::select! {
        () = interrupt() => "interrupt",
        () = terminate() => "terminate",
    };

    info!(signal = reason, "Shutdown signal received, draining connections");
}

async fn interrupt() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "Ctrl+C listener unavailable");
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            error!(error = %e, "SIGTERM listener unavailable");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}
