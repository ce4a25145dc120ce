//! Document store backends

mod factory;
mod in_memory;
pub mod migrations;
mod postgres;

pub use factory::{StoreConfig, StoreFactory, StoreType};
pub use in_memory::InMemoryDocumentStore;
pub use migrations::{Migration, PostgresMigrator, run_store_migrations};
pub use postgres::{PostgresConfig, PostgresDocumentStore};
