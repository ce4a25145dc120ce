//! Store factory for runtime backend selection

use std::sync::Arc;

use tracing::info;

use crate::domain::DomainError;
use crate::domain::store::DocumentStore;

use super::in_memory::InMemoryDocumentStore;
use super::postgres::{PostgresConfig, PostgresDocumentStore};

/// Supported store backends
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreType {
    /// In-memory store (for testing/development)
    InMemory,
    /// PostgreSQL JSONB store
    Postgres,
}

impl StoreType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Store configuration
#[derive(Debug, Clone)]
pub enum StoreConfig {
    InMemory,
    Postgres(PostgresConfig),
}

impl StoreConfig {
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    pub fn postgres(config: PostgresConfig) -> Self {
        Self::Postgres(config)
    }

    pub fn store_type(&self) -> StoreType {
        match self {
            Self::InMemory => StoreType::InMemory,
            Self::Postgres(_) => StoreType::Postgres,
        }
    }
}

/// Factory for creating document stores
#[derive(Debug)]
pub struct StoreFactory;

impl StoreFactory {
    /// Creates a store for the configuration; Postgres tables are migrated
    /// before the store is returned
    pub async fn create(config: &StoreConfig) -> Result<Arc<dyn DocumentStore>, DomainError> {
        match config {
            StoreConfig::InMemory => {
                info!("Using in-memory document store");
                Ok(Arc::new(InMemoryDocumentStore::new()))
            }
            StoreConfig::Postgres(pg_config) => {
                let store = PostgresDocumentStore::connect(pg_config).await?;
                store.migrate().await?;
                info!(table = %pg_config.table, "Connected to PostgreSQL document store");
                Ok(Arc::new(store))
            }
        }
    }
}
