//! Table endpoints

use axum::extract::{Path, State};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::table::Table;
use crate::infrastructure::services::{CreateTableRequest, UpdateTableRequest};

/// GET /tables
pub async fn list_tables(State(state): State<AppState>) -> Result<Json<Vec<Table>>, ApiError> {
    Ok(Json(state.table_service.list().await?))
}

/// GET /table/{table_id}
pub async fn get_table(
    State(state): State<AppState>,
    Path(table_id): Path<String>,
) -> Result<Json<Table>, ApiError> {
    Ok(Json(state.table_service.get(&table_id).await?))
}

/// POST /table
pub async fn create_table(
    State(state): State<AppState>,
    Json(request): Json<CreateTableRequest>,
) -> Result<Json<Table>, ApiError> {
    Ok(Json(state.table_service.create(request).await?))
}

/// PATCH /table/{table_id}
pub async fn update_table(
    State(state): State<AppState>,
    Path(table_id): Path<String>,
    Json(request): Json<UpdateTableRequest>,
) -> Result<Json<Table>, ApiError> {
    Ok(Json(state.table_service.update(&table_id, request).await?))
}
