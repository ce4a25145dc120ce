//! Restaurant management API
//!
//! REST backend for menus, food, tables, orders, order items, invoices,
//! notes and users, with:
//! - A pluggable document store (in-memory or PostgreSQL JSONB)
//! - Read-through caching of food listings and items (in-memory or Redis)
//! - JWT access tokens for every resource route

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::{info, warn};

use api::{AppState, ListingOptions};
use domain::cache::Cache;
use infrastructure::auth::JwtService;
use infrastructure::cache::CacheFactory;
use infrastructure::store::StoreFactory;

/// Create application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create application state from configuration
///
/// The store must be reachable. The cache is optional: when it is disabled
/// or cannot be reached, every read goes to the store.
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let store = StoreFactory::create(&config.store.to_store_config()?).await?;
    let cache = create_cache(config).await?;

    if config.auth.secret == infrastructure::auth::JwtConfig::default().secret {
        warn!("Using the default JWT secret; set SECRET_KEY or APP__AUTH__SECRET");
    }
    let jwt = Arc::new(JwtService::new(config.auth.jwt_config()));

    let listing = ListingOptions {
        ttl_policy: config.listing.ttl_policy(),
        item_ttl: config.listing.item_ttl(),
        deadline: config.store.request_timeout(),
    };

    Ok(AppState::new(store, cache, jwt, listing))
}

async fn create_cache(config: &AppConfig) -> anyhow::Result<Option<Arc<dyn Cache>>> {
    let Some(cache_config) = config.cache.to_cache_config()? else {
        info!("Response cache disabled");
        return Ok(None);
    };

    match CacheFactory::new().create(&cache_config).await {
        Ok(cache) => {
            info!(backend = %cache_config.cache_type, "Response cache initialized");
            Ok(Some(cache))
        }
        Err(e) => {
            warn!(error = %e, "Cache unavailable, serving every read from the store");
            Ok(None)
        }
    }
}
