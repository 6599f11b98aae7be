use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use tradingview_binance::{
    config::Config,
    exchange::client::FuturesClient,
    precision::{retry::build_with_retry, source::HttpMetadataSource},
    webhook::{self, AppState},
};

#[tokio::main]
async fn main() -> std::process::ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run().await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            std::process::ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::from_env().context("load configuration")?;

    if config.testnet {
        info!("using binance futures testnet");
    }
    if config.dry_run {
        warn!("dry run enabled, orders will not be sent to the exchange");
    }

    // No table, no trading
    let source = HttpMetadataSource::new(&config.metadata_base);
    let table = build_with_retry(&source, &config.retry)
        .await
        .context("build quantity precision table")?;

    let client = FuturesClient::new(config.credentials.clone(), config.client_option());
    let state = Arc::new(AppState::new(table, client, config.passphrase.clone()));

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("bind {}", config.listen_addr))?;

    webhook::serve(listener, state, shutdown_signal())
        .await
        .context("serve webhook")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
