//! Table service - CRUD operations for dining tables

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::info;
use validator::Validate;

use super::updates::{FieldUpdates, find_by_id, update_by_id};
use crate::domain::DomainError;
use crate::domain::store::{Collection, DocumentStore, Filter};
use crate::domain::table::{TABLE_COLLECTION, Table};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTableRequest {
    #[validate(range(min = 1))]
    pub number_of_guests: u32,
    #[validate(range(min = 1))]
    pub table_number: u32,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTableRequest {
    #[validate(range(min = 1))]
    pub number_of_guests: Option<u32>,
    #[validate(range(min = 1))]
    pub table_number: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct TableService {
    tables: Collection,
}

impl TableService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            tables: Collection::new(store, TABLE_COLLECTION),
        }
    }

    /// Overrides the per-call store deadline
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.tables = self.tables.with_deadline(deadline);
        self
    }

    pub async fn get(&self, id: &str) -> Result<Table, DomainError> {
        find_by_id(&self.tables, "table_id", id, "Table").await
    }

    pub async fn list(&self) -> Result<Vec<Table>, DomainError> {
        self.tables.find_all(&Filter::all()).await
    }

    pub async fn create(&self, request: CreateTableRequest) -> Result<Table, DomainError> {
        request.validate()?;

        let table = Table::new(request.number_of_guests, request.table_number);
        self.tables.insert(&table).await?;

        info!(table_id = %table.table_id, table_number = table.table_number, "Table created");
        Ok(table)
    }

    pub async fn update(&self, id: &str, request: UpdateTableRequest) -> Result<Table, DomainError> {
        request.validate()?;

        let mut updates = FieldUpdates::new();
        updates
            .set("number_of_guests", request.number_of_guests)?
            .set("table_number", request.table_number)?;

        update_by_id(&self.tables, "table_id", id, updates, "Table").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::store::InMemoryDocumentStore;

    fn create_service() -> TableService {
        TableService::new(Arc::new(InMemoryDocumentStore::new()))
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let service = create_service();

        let table = service
            .create(CreateTableRequest {
                number_of_guests: 4,
                table_number: 12,
            })
            .await
            .unwrap();

        assert_eq!(service.get(&table.table_id).await.unwrap(), table);
        assert_eq!(service.list().await.unwrap(), vec![table]);
    }

    #[tokio::test]
    async fn test_zero_guests_rejected() {
        let result = create_service()
            .create(CreateTableRequest {
                number_of_guests: 0,
                table_number: 1,
            })
            .await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_update_guests() {
        let service = create_service();
        let table = service
            .create(CreateTableRequest {
                number_of_guests: 2,
                table_number: 3,
            })
            .await
            .unwrap();

        let updated = service
            .update(
                &table.table_id,
                UpdateTableRequest {
                    number_of_guests: Some(6),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.number_of_guests, 6);
        assert_eq!(updated.table_number, 3);
    }
}
