use std::time::Duration;

use serde::Deserialize;

use crate::domain::listing::TtlPolicy;
use crate::infrastructure::auth::JwtConfig;
use crate::infrastructure::cache::{CacheConfig, CacheType};
use crate::infrastructure::observability::ObservabilityConfig;
use crate::infrastructure::store::{PostgresConfig, StoreConfig, StoreType};

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub store: StoreSettings,
    pub cache: CacheSettings,
    pub listing: ListingSettings,
    pub auth: AuthSettings,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Document store settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// `in_memory` or `postgres`
    pub backend: String,
    pub database_url: Option<String>,
    pub table: String,
    pub max_connections: u32,
    /// Deadline for every store call made while serving a request
    pub request_timeout_secs: u64,
}

/// Response cache settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub enabled: bool,
    /// `in_memory` or `redis`
    pub backend: String,
    pub redis_url: Option<String>,
    pub key_prefix: Option<String>,
    pub max_capacity: u64,
}

/// Cache lifetimes for listings and single items
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListingSettings {
    pub empty_ttl_secs: u64,
    pub populated_ttl_secs: u64,
    pub item_ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub secret: String,
    pub access_token_hours: u64,
    pub refresh_token_hours: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: "in_memory".to_string(),
            database_url: None,
            table: "documents".to_string(),
            max_connections: 10,
            request_timeout_secs: 100,
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            backend: "in_memory".to_string(),
            redis_url: None,
            key_prefix: None,
            max_capacity: 10_000,
        }
    }
}

impl Default for ListingSettings {
    fn default() -> Self {
        Self {
            empty_ttl_secs: 60,
            populated_ttl_secs: 300,
            item_ttl_secs: 600,
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        let defaults = JwtConfig::default();

        Self {
            secret: defaults.secret,
            access_token_hours: defaults.access_token_hours,
            refresh_token_hours: defaults.refresh_token_hours,
        }
    }
}

impl StoreSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Resolves the backend selection into a factory configuration
    pub fn to_store_config(&self) -> anyhow::Result<StoreConfig> {
        let backend = StoreType::from_str(&self.backend)
            .ok_or_else(|| anyhow::anyhow!("Unknown store backend: {}", self.backend))?;

        match backend {
            StoreType::InMemory => Ok(StoreConfig::in_memory()),
            StoreType::Postgres => {
                let url = self.database_url.as_deref().ok_or_else(|| {
                    anyhow::anyhow!("store.database_url is required for the postgres backend")
                })?;

                Ok(StoreConfig::postgres(
                    PostgresConfig::new(url)
                        .with_table(&self.table)
                        .with_max_connections(self.max_connections),
                ))
            }
        }
    }
}

impl CacheSettings {
    /// `None` when caching is switched off
    pub fn to_cache_config(&self) -> anyhow::Result<Option<CacheConfig>> {
        if !self.enabled {
            return Ok(None);
        }

        let config = match self.backend.parse::<CacheType>()? {
            CacheType::InMemory => CacheConfig::in_memory().with_max_capacity(self.max_capacity),
            CacheType::Redis => {
                let url = self.redis_url.as_deref().ok_or_else(|| {
                    anyhow::anyhow!("cache.redis_url is required for the redis backend")
                })?;
                CacheConfig::redis(url)
            }
        };

        Ok(Some(match &self.key_prefix {
            Some(prefix) => config.with_key_prefix(prefix),
            None => config,
        }))
    }
}

impl ListingSettings {
    pub fn ttl_policy(&self) -> TtlPolicy {
        TtlPolicy::new(
            Duration::from_secs(self.empty_ttl_secs),
            Duration::from_secs(self.populated_ttl_secs),
        )
    }

    pub fn item_ttl(&self) -> Duration {
        Duration::from_secs(self.item_ttl_secs)
    }
}

impl AuthSettings {
    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig::new(&self.secret)
            .with_lifetimes(self.access_token_hours, self.refresh_token_hours)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.port", env_var("PORT"))?
            .set_override_option("store.database_url", env_var("DATABASE_URL"))?
            .set_override_option("cache.redis_url", env_var("REDIS_URL"))?
            .set_override_option("auth.secret", env_var("SECRET_KEY"))?
            .build()?;

        config.try_deserialize()
    }
}

/// Unprefixed variable honored for compatibility with older deployments
fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.store.backend, "in_memory");
        assert_eq!(config.store.request_timeout(), Duration::from_secs(100));
        assert!(config.cache.enabled);
        assert_eq!(config.listing.ttl_policy(), TtlPolicy::default());
        assert_eq!(config.listing.item_ttl(), Duration::from_secs(600));
        assert_eq!(config.auth.access_token_hours, 24);
        assert_eq!(config.auth.refresh_token_hours, 168);
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config: AppConfig = serde_json::from_str(
            r#"{"server": {"port": 9000}, "logging": {"format": "json"}, "listing": {"empty_ttl_secs": 5}}"#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.listing.empty_ttl_secs, 5);
        assert_eq!(config.listing.populated_ttl_secs, 300);
    }

    #[test]
    fn test_store_config_resolution() {
        let settings = StoreSettings::default();
        assert!(matches!(settings.to_store_config().unwrap(), StoreConfig::InMemory));

        let postgres = StoreSettings {
            backend: "postgres".to_string(),
            database_url: Some("postgres://localhost/restaurant".to_string()),
            ..Default::default()
        };
        let StoreConfig::Postgres(pg) = postgres.to_store_config().unwrap() else {
            panic!("expected postgres config");
        };
        assert_eq!(pg.table, "documents");
        assert_eq!(pg.max_connections, 10);
    }

    #[test]
    fn test_store_config_errors() {
        let missing_url = StoreSettings {
            backend: "postgres".to_string(),
            ..Default::default()
        };
        assert!(missing_url.to_store_config().is_err());

        let unknown = StoreSettings {
            backend: "mongo".to_string(),
            ..Default::default()
        };
        assert!(unknown.to_store_config().is_err());
    }

    #[test]
    fn test_cache_config_resolution() {
        let disabled = CacheSettings {
            enabled: false,
            ..Default::default()
        };
        assert!(disabled.to_cache_config().unwrap().is_none());

        let redis = CacheSettings {
            backend: "redis".to_string(),
            redis_url: Some("redis://localhost:6379".to_string()),
            key_prefix: Some("restaurant".to_string()),
            ..Default::default()
        };
        let config = redis.to_cache_config().unwrap().unwrap();
        assert_eq!(config.cache_type, CacheType::Redis);
        assert_eq!(config.key_prefix.as_deref(), Some("restaurant"));

        let no_url = CacheSettings {
            backend: "redis".to_string(),
            ..Default::default()
        };
        assert!(no_url.to_cache_config().is_err());
    }

    #[test]
    fn test_jwt_config_from_auth_settings() {
        let settings = AuthSettings {
            secret: "s3cret".to_string(),
            access_token_hours: 1,
            refresh_token_hours: 2,
        };

        let jwt = settings.jwt_config();
        assert_eq!(jwt.secret, "s3cret");
        assert_eq!(jwt.access_token_hours, 1);
        assert_eq!(jwt.refresh_token_hours, 2);
    }
}
