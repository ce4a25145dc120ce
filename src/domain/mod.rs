//! Domain layer - Core business logic and entities

pub mod cache;
pub mod common;
pub mod error;
pub mod food;
pub mod invoice;
pub mod listing;
pub mod menu;
pub mod note;
pub mod order;
pub mod store;
pub mod table;
pub mod user;

pub use cache::{Cache, CacheKeyGenerator, CacheKeyParams, DefaultKeyGenerator};
pub use error::DomainError;
pub use listing::{CacheLookup, PagePlan, PageResult, ReadThroughCache, TtlPolicy};
pub use store::{Collection, Document, DocumentStore, Filter, Pipeline};
