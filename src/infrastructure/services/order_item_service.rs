//! Order item service
//!
//! Items are created in batches for a table: a new order is opened for the
//! table and every item in the batch is attached to it.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use super::order_service::{CreateOrderRequest, OrderService};
use super::updates::{FieldUpdates, ensure_exists, find_by_id, update_by_id};
use crate::domain::DomainError;
use crate::domain::common::round_to;
use crate::domain::food::FOOD_COLLECTION;
use crate::domain::order::{ORDER_ITEM_COLLECTION, OrderItem, Portion};
use crate::domain::store::{Collection, DocumentStore, Filter};

/// One line of a batch
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderItemInput {
    #[validate(length(min = 1))]
    pub food_id: String,
    pub quantity: Portion,
    #[validate(range(min = 0.0))]
    pub unit_price: f64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOrderItemsRequest {
    #[validate(length(min = 1))]
    pub table_id: String,
    #[validate(length(min = 1))]
    pub order_items: Vec<OrderItemInput>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateOrderItemRequest {
    #[validate(length(min = 1))]
    pub food_id: Option<String>,
    pub quantity: Option<Portion>,
    #[validate(range(min = 0.0))]
    pub unit_price: Option<f64>,
}

/// Result of a batch create
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderItemsCreated {
    pub order_id: String,
    pub inserted: u64,
    pub order_items: Vec<OrderItem>,
}

#[derive(Debug, Clone)]
pub struct OrderItemService {
    items: Collection,
    foods: Collection,
    orders: OrderService,
}

impl OrderItemService {
    pub fn new(store: Arc<dyn DocumentStore>, orders: OrderService) -> Self {
        Self {
            items: Collection::new(store.clone(), ORDER_ITEM_COLLECTION),
            foods: Collection::new(store, FOOD_COLLECTION),
            orders,
        }
    }

    /// Overrides the per-call store deadline
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.items = self.items.with_deadline(deadline);
        self.foods = self.foods.with_deadline(deadline);
        self.orders = self.orders.with_deadline(deadline);
        self
    }

    pub async fn get(&self, id: &str) -> Result<OrderItem, DomainError> {
        find_by_id(&self.items, "order_item_id", id, "Order item").await
    }

    pub async fn list(&self) -> Result<Vec<OrderItem>, DomainError> {
        self.items.find_all(&Filter::all()).await
    }

    /// Items belonging to one order; an unknown order is a 404
    pub async fn list_by_order(&self, order_id: &str) -> Result<Vec<OrderItem>, DomainError> {
        if !self.orders.exists(order_id).await? {
            return Err(DomainError::not_found(format!("Order '{}' not found", order_id)));
        }

        self.items.find_all(&Filter::eq("order_id", order_id)).await
    }

    /// Validates the whole batch, opens an order for the table and inserts
    /// the items under it
    pub async fn create(
        &self,
        request: CreateOrderItemsRequest,
    ) -> Result<OrderItemsCreated, DomainError> {
        request.validate()?;
        for input in &request.order_items {
            input.validate()?;
            ensure_exists(&self.foods, "food_id", &input.food_id, "Food").await?;
        }

        let order = self
            .orders
            .create(CreateOrderRequest {
                table_id: request.table_id,
                order_date: None,
            })
            .await?;

        let order_items: Vec<OrderItem> = request
            .order_items
            .into_iter()
            .map(|input| {
                OrderItem::new(&order.order_id, input.food_id, input.quantity, input.unit_price)
            })
            .collect();

        let inserted = self.items.insert_many(&order_items).await?;

        info!(order_id = %order.order_id, inserted, "Order items created");

        Ok(OrderItemsCreated {
            order_id: order.order_id,
            inserted,
            order_items,
        })
    }

    pub async fn update(
        &self,
        id: &str,
        request: UpdateOrderItemRequest,
    ) -> Result<OrderItem, DomainError> {
        request.validate()?;

        if let Some(food_id) = &request.food_id {
            ensure_exists(&self.foods, "food_id", food_id, "Food").await?;
        }

        let mut updates = FieldUpdates::new();
        updates
            .set("food_id", request.food_id)?
            .set("quantity", request.quantity)?
            .set("unit_price", request.unit_price.map(|price| round_to(price, 2)))?;

        update_by_id(&self.items, "order_item_id", id, updates, "Order item").await
    }
}
