//! Database migration runner for Moneta.
//!
//! Usage:
//!   migrator [up]    - Run all pending migrations (default)
//!   migrator down    - Roll back the last migration
//!   migrator status  - Show migration status
//!   migrator fresh   - Drop all tables and re-run migrations
//!   migrator reset   - Roll back every migration
//!
//! The connection comes from the same configuration as the server
//! (`config/*.toml`, then `MONETA__DATABASE__URL`).

use anyhow::{Context, bail};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use moneta_db::migration::Migrator;
use moneta_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moneta=info,sea_orm_migration=info".into()),
        )
        .init();

    let command = std::env::args().nth(1).unwrap_or_else(|| "up".to_string());

    let config = AppConfig::load().context("Failed to load configuration")?;
    if config.database.is_in_memory() {
        bail!("database.url selects the in-memory store; nothing to migrate");
    }
    let db = moneta_db::connect(&config.database)
        .await
        .context("Failed to connect to database")?;

    match command.as_str() {
        "up" => Migrator::up(&db, None).await?,
        "down" => Migrator::down(&db, Some(1)).await?,
        "status" => Migrator::status(&db).await?,
        "fresh" => Migrator::fresh(&db).await?,
        "reset" => Migrator::reset(&db).await?,
        other => bail!("unknown command '{other}' (expected up, down, status, fresh, reset)"),
    }

    info!(command = %command, "Migration command finished");
    Ok(())
}
