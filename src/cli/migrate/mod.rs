//! Migrate command - prepares the document store and exits

use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::logging::{LoggingConfig, init_logging};
use crate::infrastructure::store::{PostgresConfig, PostgresDocumentStore, StoreConfig};

/// Run store migrations
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_logging(&LoggingConfig::from(&config.logging));

    match config.store.to_store_config()? {
        StoreConfig::InMemory => {
            info!("In-memory store selected, nothing to migrate");
        }
        StoreConfig::Postgres(pg_config) => migrate_postgres(&pg_config).await?,
    }

    Ok(())
}

async fn migrate_postgres(config: &PostgresConfig) -> anyhow::Result<()> {
    let store = PostgresDocumentStore::connect(config).await?;
    store.migrate().await?;

    info!(table = %config.table, "Document store migrations applied");
    Ok(())
}
