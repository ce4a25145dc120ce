//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, AuthSettings, CacheSettings, ListingSettings, LogFormat, LoggingConfig,
    ServerConfig, StoreSettings,
};
