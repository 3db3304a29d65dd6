//! Migrate command - applies the PostgreSQL schema

use anyhow::Context;
use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::storage::{
    PostgresMigrator, StorageFactory, StorageType, run_storage_migrations,
};

/// Run all pending storage migrations
pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    if StorageType::from_str(&config.storage.backend) != Some(StorageType::Postgres) {
        anyhow::bail!(
            "migrate needs the postgres backend, configured backend is '{}'",
            config.storage.backend
        );
    }

    let backends = StorageFactory::create(&config.storage).await?;
    let pool = backends
        .pool
        .context("postgres backend did not provide a connection pool")?;

    run_storage_migrations(&pool).await?;

    let version = PostgresMigrator::new(pool).current_version().await?;
    info!(?version, "Schema is up to date");
    println!("schema version: {}", version.unwrap_or(0));

    Ok(())
}
