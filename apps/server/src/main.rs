use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use transcript_gateway_core::{
    YouTubeProvider,
    proxy::{PROXY_PASSWORD_ENV, PROXY_USERNAME_ENV},
};

use crate::{config::Cli, logging::init_logging, routes::router};

mod config;
mod logging;
mod routes;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    let proxy = cli.proxy();
    if proxy.is_proxied() {
        tracing::info!("Routing YouTube requests through {}", proxy.describe());
    } else {
        tracing::warn!(
            "{} / {} not set; fetching transcripts without a proxy",
            PROXY_USERNAME_ENV,
            PROXY_PASSWORD_ENV
        );
    }

    let provider = YouTubeProvider::new(proxy).context("Failed to build YouTube client")?;
    let app = router(Arc::new(provider));

    let addr = cli.bind_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
