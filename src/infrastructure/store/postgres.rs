//! PostgreSQL document store with connection pooling

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};

use crate::domain::DomainError;
use crate::domain::store::{
    Document, DocumentStore, Filter, Pipeline, UpdateOutcome, evaluate_stages,
};

use super::migrations::run_store_migrations;

static TABLE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$")
        .unwrap_or_else(|e| panic!("invalid table name pattern: {}", e))
});

/// PostgreSQL store configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Table holding every collection's documents
    pub table: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Idle timeout in seconds
    pub idle_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/restaurant".to_string(),
            table: "documents".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }
}

/// Validates a table name before it is interpolated into SQL
pub(crate) fn checked_table_name(table: &str) -> Result<&str, DomainError> {
    if TABLE_NAME.is_match(table) {
        Ok(table)
    } else {
        Err(DomainError::configuration(format!(
            "Invalid table name '{}'",
            table
        )))
    }
}

/// Document store over a single JSONB table
///
/// Rows carry `(id, collection, data, created_at, updated_at)`; `id` is a
/// BIGSERIAL so ordering by it yields insertion order. Equality filters are
/// JSONB containment checks (`data @> filter`).
pub struct PostgresDocumentStore {
    pool: PgPool,
    table: String,
}

impl Debug for PostgresDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresDocumentStore")
            .field("table", &self.table)
            .finish()
    }
}

impl PostgresDocumentStore {
    pub fn new(pool: PgPool, table: impl Into<String>) -> Result<Self, DomainError> {
        let table = table.into();
        checked_table_name(&table)?;

        Ok(Self { pool, table })
    }

    /// Connects a pool and wraps it in a store
    pub async fn connect(config: &PostgresConfig) -> Result<Self, DomainError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))?;

        Self::new(pool, config.table.clone())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the document table and its indexes if they are missing
    pub async fn migrate(&self) -> Result<(), DomainError> {
        run_store_migrations(&self.pool, &self.table).await
    }

    async fn select(
        &self,
        collection: &str,
        filter: &Filter,
        limit: Option<i64>,
    ) -> Result<Vec<Document>, DomainError> {
        let mut query = format!(
            "SELECT data FROM {} WHERE collection = $1 AND data @> $2 ORDER BY id",
            self.table
        );
        if limit.is_some() {
            query.push_str(" LIMIT $3");
        }

        let mut statement = sqlx::query(&query).bind(collection).bind(filter.to_json());
        if let Some(limit) = limit {
            statement = statement.bind(limit);
        }

        let rows = statement
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to query {}: {}", collection, e)))?;

        rows.iter().map(row_to_document).collect()
    }
}

fn row_to_document(row: &PgRow) -> Result<Document, DomainError> {
    let data: Value = row
        .try_get("data")
        .map_err(|e| DomainError::storage(format!("Failed to read document: {}", e)))?;

    match data {
        Value::Object(document) => Ok(document),
        other => Err(DomainError::storage(format!(
            "Stored document is not an object: {}",
            other
        ))),
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, DomainError> {
        self.select(collection, filter, None).await
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Document>, DomainError> {
        Ok(self.select(collection, filter, Some(1)).await?.into_iter().next())
    }

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64, DomainError> {
        let query = format!(
            "SELECT COUNT(*) FROM {} WHERE collection = $1 AND data @> $2",
            self.table
        );

        let count: i64 = sqlx::query_scalar(&query)
            .bind(collection)
            .bind(filter.to_json())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count {}: {}", collection, e)))?;

        Ok(count.max(0) as u64)
    }

    async fn aggregate(
        &self,
        collection: &str,
        pipeline: &Pipeline,
    ) -> Result<Vec<Document>, DomainError> {
        let (filter, rest) = pipeline.split_leading_match();
        let documents = self.select(collection, &filter, None).await?;

        evaluate_stages(rest, documents)
    }

    async fn insert_one(&self, collection: &str, document: Document) -> Result<(), DomainError> {
        let query = format!(
            "INSERT INTO {} (collection, data) VALUES ($1, $2)",
            self.table
        );

        sqlx::query(&query)
            .bind(collection)
            .bind(Value::Object(document))
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to insert into {}: {}", collection, e)))?;

        Ok(())
    }

    async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> Result<u64, DomainError> {
        let query = format!(
            "INSERT INTO {} (collection, data) VALUES ($1, $2)",
            self.table
        );

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        let mut inserted = 0;
        for document in documents {
            sqlx::query(&query)
                .bind(collection)
                .bind(Value::Object(document))
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    DomainError::storage(format!("Failed to insert into {}: {}", collection, e))
                })?;
            inserted += 1;
        }

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit insert: {}", e)))?;

        Ok(inserted)
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        fields: Document,
    ) -> Result<UpdateOutcome, DomainError> {
        let query = format!(
            r#"
            UPDATE {table}
            SET data = data || $3, updated_at = NOW()
            WHERE id = (
                SELECT id FROM {table}
                WHERE collection = $1 AND data @> $2
                ORDER BY id
                LIMIT 1
            )
            "#,
            table = self.table
        );

        let result = sqlx::query(&query)
            .bind(collection)
            .bind(filter.to_json())
            .bind(Value::Object(fields))
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to update {}: {}", collection, e)))?;

        Ok(UpdateOutcome {
            matched: result.rows_affected(),
        })
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<bool, DomainError> {
        let query = format!(
            r#"
            DELETE FROM {table}
            WHERE id = (
                SELECT id FROM {table}
                WHERE collection = $1 AND data @> $2
                ORDER BY id
                LIMIT 1
            )
            "#,
            table = self.table
        );

        let result = sqlx::query(&query)
            .bind(collection)
            .bind(filter.to_json())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete from {}: {}", collection, e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("PostgreSQL ping failed: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgres_config_default() {
        let config = PostgresConfig::default();

        assert_eq!(config.table, "documents");
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 1);
        assert_eq!(config.connect_timeout_secs, 30);
        assert_eq!(config.idle_timeout_secs, 600);
    }

    #[test]
    fn test_postgres_config_builder() {
        let config = PostgresConfig::new("postgres://localhost/test")
            .with_table("restaurant_docs")
            .with_max_connections(20)
            .with_connect_timeout(5);

        assert_eq!(config.url, "postgres://localhost/test");
        assert_eq!(config.table, "restaurant_docs");
        assert_eq!(config.max_connections, 20);
        assert_eq!(config.connect_timeout_secs, 5);
    }

    #[test]
    fn test_checked_table_name() {
        assert!(checked_table_name("documents").is_ok());
        assert!(checked_table_name("_docs_2").is_ok());
        assert!(checked_table_name("docs; DROP TABLE x").is_err());
        assert!(checked_table_name("1docs").is_err());
        assert!(checked_table_name("").is_err());
    }

    #[tokio::test]
    #[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
    async fn test_postgres_round_trip() {
        use serde_json::json;

        let url = std::env::var("DATABASE_URL").unwrap();
        let store = PostgresDocumentStore::connect(&PostgresConfig::new(url).with_table("documents_test"))
            .await
            .unwrap();
        store.migrate().await.unwrap();

        let doc = json!({"food_id": "pg-1", "name": "Soup"}).as_object().cloned().unwrap();
        store.insert_one("food", doc).await.unwrap();

        let found = store
            .find_one("food", &Filter::eq("food_id", "pg-1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found["name"], json!("Soup"));

        assert!(store.delete_one("food", &Filter::eq("food_id", "pg-1")).await.unwrap());
    }
}
