//! Quote relay HTTP server.
//!
//! Wires the provider fetcher and the SQLite store into `QuoteService`, serves
//! `GET /quote` on the configured port and closes the pool after a graceful shutdown
//! on Ctrl+C / SIGTERM.
#![warn(missing_docs)]
use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use log::{error, info};
use quote_common::{AppError, Result};
use quote_server::config::ServerConfig;
use quote_server::fetcher::HttpQuoteFetcher;
use quote_server::handler::{AppState, router};
use quote_server::service::QuoteService;
use quote_server::store::SqliteQuoteStore;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    init_logger();
    let config = ServerConfig::parse();

    let fetcher = Arc::new(HttpQuoteFetcher::new(&config.api)?);
    let store = Arc::new(SqliteQuoteStore::connect(&config.database).await?);
    let service = Arc::new(QuoteService::new(fetcher, store.clone()));
    let app = router(AppState {
        service,
        request_timeout: config.request_timeout,
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await.map_err(AppError::internal)?;
    info!("Quote server listening on {}", listener.local_addr().map_err(AppError::internal)?);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;
    store.close().await;
    if let Err(e) = served {
        error!("Server stopped with error: {}", e);
        return Err(AppError::internal(e));
    }
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
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
                error!("Failed to listen for SIGTERM: {}", e);
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
    info!("Shutdown signal received, draining connections...");
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
