//! Order item endpoints

use axum::extract::{Path, State};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::order::OrderItem;
use crate::infrastructure::services::{
    CreateOrderItemsRequest, OrderItemsCreated, UpdateOrderItemRequest,
};

/// GET /orderitems
pub async fn list_order_items(
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderItem>>, ApiError> {
    Ok(Json(state.order_item_service.list().await?))
}

/// GET /orderitems-order/{order_id}
pub async fn list_order_items_by_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<Vec<OrderItem>>, ApiError> {
    Ok(Json(state.order_item_service.list_by_order(&order_id).await?))
}

/// GET /orderitem/{order_item_id}
pub async fn get_order_item(
    State(state): State<AppState>,
    Path(order_item_id): Path<String>,
) -> Result<Json<OrderItem>, ApiError> {
    Ok(Json(state.order_item_service.get(&order_item_id).await?))
}

/// POST /orderitem
///
/// Opens an order for the table and attaches every item to it.
pub async fn create_order_items(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderItemsRequest>,
) -> Result<Json<OrderItemsCreated>, ApiError> {
    debug!(
        table_id = %request.table_id,
        items = request.order_items.len(),
        "Creating order items"
    );

    Ok(Json(state.order_item_service.create(request).await?))
}

/// PATCH /orderitem/{order_item_id}
pub async fn update_order_item(
    State(state): State<AppState>,
    Path(order_item_id): Path<String>,
    Json(request): Json<UpdateOrderItemRequest>,
) -> Result<Json<OrderItem>, ApiError> {
    Ok(Json(
        state
            .order_item_service
            .update(&order_item_id, request)
            .await?,
    ))
}
