//! `aptpark`: interactive console for the apartment parking manager.

mod config;
mod menu;

use anyhow::{Context, Result};
use aptpark_services::console::StdConsole;
use aptpark_storage::Database;
use config::{AppConfig, LOG_VAR};
use menu::Shell;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_VAR).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    info!(database = %config.database_path, "Starting aptpark");

    let db = Database::new(config.database())
        .await
        .with_context(|| format!("Failed to open database {}", config.database_path))?;
    db.health_check().await.context("Database is not answering queries")?;

    let mut shell = Shell::new(db.clone(), StdConsole::new(), &config)
        .await
        .context("Failed to load the guest waiting list")?;
    shell.run().await?;

    db.close().await;
    info!("Goodbye");
    Ok(())
}
