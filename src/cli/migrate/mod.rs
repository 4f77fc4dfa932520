//! Migrate command - applies the PostgreSQL schema

use anyhow::Context;
use tracing::info;

use crate::infrastructure::storage::{connect_pool, run_storage_migrations, PostgresConfig};

pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let pg = PostgresConfig::from_database_config(&config.database)
        .context("database.url or DATABASE_URL must be set to run migrations")?;
    let pool = connect_pool(&pg).await?;

    let version = run_storage_migrations(&pool).await?;
    info!(version = ?version, "Database schema is up to date");

    pool.close().await;
    Ok(())
}
