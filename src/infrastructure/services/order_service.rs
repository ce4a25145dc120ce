//! Order service - CRUD operations for orders

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use super::updates::{FieldUpdates, ensure_exists, find_by_id, update_by_id};
use crate::domain::DomainError;
use crate::domain::order::{ORDER_COLLECTION, Order};
use crate::domain::store::{Collection, DocumentStore, Filter};
use crate::domain::table::TABLE_COLLECTION;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1))]
    pub table_id: String,
    /// Defaults to the time of creation
    pub order_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateOrderRequest {
    #[validate(length(min = 1))]
    pub table_id: Option<String>,
    pub order_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct OrderService {
    orders: Collection,
    tables: Collection,
}

impl OrderService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            orders: Collection::new(store.clone(), ORDER_COLLECTION),
            tables: Collection::new(store, TABLE_COLLECTION),
        }
    }

    /// Overrides the per-call store deadline
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.orders = self.orders.with_deadline(deadline);
        self.tables = self.tables.with_deadline(deadline);
        self
    }

    pub async fn get(&self, id: &str) -> Result<Order, DomainError> {
        find_by_id(&self.orders, "order_id", id, "Order").await
    }

    pub async fn list(&self) -> Result<Vec<Order>, DomainError> {
        self.orders.find_all(&Filter::all()).await
    }

    pub async fn exists(&self, id: &str) -> Result<bool, DomainError> {
        self.orders.exists(&Filter::eq("order_id", id)).await
    }

    pub async fn create(&self, request: CreateOrderRequest) -> Result<Order, DomainError> {
        request.validate()?;
        ensure_exists(&self.tables, "table_id", &request.table_id, "Table").await?;

        let order = Order::new(request.table_id, request.order_date.unwrap_or_else(Utc::now));
        self.orders.insert(&order).await?;

        info!(order_id = %order.order_id, table_id = %order.table_id, "Order created");
        Ok(order)
    }

    pub async fn update(&self, id: &str, request: UpdateOrderRequest) -> Result<Order, DomainError> {
        request.validate()?;

        if let Some(table_id) = &request.table_id {
            ensure_exists(&self.tables, "table_id", table_id, "Table").await?;
        }

        let mut updates = FieldUpdates::new();
        updates
            .set("table_id", request.table_id)?
            .set("order_date", request.order_date)?;

        update_by_id(&self.orders, "order_id", id, updates, "Order").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::store::to_document;
    use crate::domain::table::Table;
    use crate::infrastructure::store::InMemoryDocumentStore;

    async fn service_with_table() -> (OrderService, Table) {
        let store = Arc::new(InMemoryDocumentStore::new());
        let table = Table::new(2, 5);
        store
            .insert_one(TABLE_COLLECTION, to_document(&table).unwrap())
            .await
            .unwrap();

        (OrderService::new(store), table)
    }

    #[tokio::test]
    async fn test_create_defaults_order_date() {
        let (service, table) = service_with_table().await;
        let before = Utc::now();

        let order = service
            .create(CreateOrderRequest {
                table_id: table.table_id.clone(),
                order_date: None,
            })
            .await
            .unwrap();

        assert!(order.order_date >= before);
        assert_eq!(service.get(&order.order_id).await.unwrap(), order);
        assert!(service.exists(&order.order_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_create_requires_table() {
        let (service, _) = service_with_table().await;

        let result = service
            .create(CreateOrderRequest {
                table_id: "missing".to_string(),
                order_date: None,
            })
            .await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_rejects_unknown_table() {
        let (service, table) = service_with_table().await;
        let order = service
            .create(CreateOrderRequest {
                table_id: table.table_id,
                order_date: None,
            })
            .await
            .unwrap();

        let result = service
            .update(
                &order.order_id,
                UpdateOrderRequest {
                    table_id: Some("missing".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }
}
