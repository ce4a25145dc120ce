//! Schema migrations for the document table

use sqlx::postgres::PgPool;
use tracing::info;

use crate::domain::DomainError;

use super::postgres::checked_table_name;

/// A versioned schema change, applied statement by statement
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: i64,
    pub description: String,
    pub statements: Vec<String>,
}

impl Migration {
    pub fn new(version: i64, description: impl Into<String>, statements: Vec<String>) -> Self {
        Self {
            version,
            description: description.into(),
            statements,
        }
    }
}

/// Applies migrations once each, recording them in `_migrations`
#[derive(Debug)]
pub struct PostgresMigrator {
    pool: PgPool,
}

impl PostgresMigrator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn ensure_migrations_table(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version BIGINT PRIMARY KEY,
                description TEXT NOT NULL,
                installed_on TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create migrations table: {}", e)))?;

        Ok(())
    }

    /// Runs a migration unless it was already applied; returns whether it ran
    pub async fn run_migration(&self, migration: &Migration) -> Result<bool, DomainError> {
        self.ensure_migrations_table().await?;

        let applied: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _migrations WHERE version = $1)")
                .bind(migration.version)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::storage(format!("Failed to check migration status: {}", e))
                })?;

        if applied {
            return Ok(false);
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        for statement in &migration.statements {
            sqlx::query(statement).execute(&mut *tx).await.map_err(|e| {
                DomainError::storage(format!(
                    "Failed to run migration {}: {}",
                    migration.version, e
                ))
            })?;
        }

        sqlx::query("INSERT INTO _migrations (version, description) VALUES ($1, $2)")
            .bind(migration.version)
            .bind(&migration.description)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to record migration {}: {}",
                    migration.version, e
                ))
            })?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit migration: {}", e)))?;

        Ok(true)
    }

    /// Returns the latest applied migration version
    pub async fn current_version(&self) -> Result<Option<i64>, DomainError> {
        self.ensure_migrations_table().await?;

        sqlx::query_scalar("SELECT MAX(version) FROM _migrations")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get migration version: {}", e)))
    }
}

/// Migrations for the document table with the given name
pub fn store_migrations(table: &str) -> Vec<Migration> {
    vec![
        Migration::new(
            1,
            format!("Create {} table", table),
            vec![format!(
                r#"
                CREATE TABLE IF NOT EXISTS {table} (
                    id BIGSERIAL PRIMARY KEY,
                    collection VARCHAR(64) NOT NULL,
                    data JSONB NOT NULL,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                )
                "#
            )],
        ),
        Migration::new(
            2,
            format!("Index {} by collection and contents", table),
            vec![
                format!(
                    "CREATE INDEX IF NOT EXISTS idx_{table}_collection ON {table} (collection, id)"
                ),
                format!(
                    "CREATE INDEX IF NOT EXISTS idx_{table}_data ON {table} USING GIN (data jsonb_path_ops)"
                ),
            ],
        ),
    ]
}

/// Runs all pending migrations for the document table
pub async fn run_store_migrations(pool: &PgPool, table: &str) -> Result<(), DomainError> {
    let table = checked_table_name(table)?;
    let migrator = PostgresMigrator::new(pool.clone());

    for migration in store_migrations(table) {
        if migrator.run_migration(&migration).await? {
            info!(version = migration.version, description = %migration.description, "Applied migration");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_migrations_order() {
        let migrations = store_migrations("documents");

        for pair in migrations.windows(2) {
            assert!(pair[1].version > pair[0].version);
        }
    }

    #[test]
    fn test_store_migrations_use_table_name() {
        let migrations = store_migrations("docs");

        assert!(migrations[0].statements[0].contains("CREATE TABLE IF NOT EXISTS docs"));
        assert!(migrations[1].statements.iter().all(|s| s.contains("ON docs")));
        assert!(migrations.iter().all(|m| !m.description.is_empty()));
    }
}
