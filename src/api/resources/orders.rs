//! Order endpoints

use axum::extract::{Path, State};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::order::Order;
use crate::infrastructure::services::{CreateOrderRequest, UpdateOrderRequest};

/// GET /orders
pub async fn list_orders(State(state): State<AppState>) -> Result<Json<Vec<Order>>, ApiError> {
    Ok(Json(state.order_service.list().await?))
}

/// GET /order/{order_id}
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    Ok(Json(state.order_service.get(&order_id).await?))
}

/// POST /order
pub async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<Json<Order>, ApiError> {
    debug!(table_id = %request.table_id, "Creating order");

    Ok(Json(state.order_service.create(request).await?))
}

/// PATCH /order/{order_id}
pub async fn update_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    Json(request): Json<UpdateOrderRequest>,
) -> Result<Json<Order>, ApiError> {
    Ok(Json(state.order_service.update(&order_id, request).await?))
}
