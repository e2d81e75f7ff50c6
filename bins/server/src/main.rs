//! Moneta API Server
//!
//! Main entry point for the Moneta banking service.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use moneta_api::{AppState, create_router};
use moneta_core::{BankService, InMemoryStore};
use moneta_db::{PgLedgerStore, PgMemberStore, connect};
use moneta_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moneta=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let bank = if config.database.is_in_memory() {
        info!("Using in-memory ledger store");
        let store = InMemoryStore::new();
        BankService::new(
            Arc::new(store.clone()),
            Arc::new(store),
            config.ledger.clone(),
        )
    } else {
        let db = connect(&config.database)
            .await
            .context("Failed to connect to database")?;
        info!(
            max_connections = config.database.max_connections,
            "Connected to database"
        );
        BankService::new(
            Arc::new(PgLedgerStore::new(db.clone())),
            Arc::new(PgMemberStore::new(db)),
            config.ledger.clone(),
        )
    };

    let app = create_router(
        AppState::new(bank),
        Duration::from_secs(config.server.request_timeout_secs),
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(
        minimum_opening_balance = %config.ledger.minimum_opening_balance,
        "Server listening on {}",
        addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
