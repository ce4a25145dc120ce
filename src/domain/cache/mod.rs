//! Cache domain - Key-value cache abstraction used by read-through lookups

mod key;
mod repository;

pub use key::{CacheKeyGenerator, CacheKeyParams, DefaultKeyGenerator};
pub use repository::Cache;

#[cfg(test)]
pub use repository::mock::MockCache;
