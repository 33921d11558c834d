pub mod board;
pub mod init;
pub mod rule;

use anyhow::{Context, Result};
use sqlx::SqlitePool;

use crate::adapters::sqlite::{initialize_database, PoolConfig};
use crate::domain::models::Config;

/// Open the configured database, applying any pending migrations.
pub async fn open_database(config: &Config) -> Result<SqlitePool> {
    let url = format!("sqlite:{}", config.database.path);
    initialize_database(&url, Some(PoolConfig::from(&config.database)))
        .await
        .with_context(|| {
            format!(
                "Failed to open database at {}. Run 'projectflow init' first.",
                config.database.path
            )
        })
}
