//! Menu endpoints

use axum::extract::{Path, State};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::menu::Menu;
use crate::infrastructure::services::{CreateMenuRequest, UpdateMenuRequest};

/// GET /menus
pub async fn list_menus(State(state): State<AppState>) -> Result<Json<Vec<Menu>>, ApiError> {
    Ok(Json(state.menu_service.list().await?))
}

/// GET /menu/{menu_id}
pub async fn get_menu(
    State(state): State<AppState>,
    Path(menu_id): Path<String>,
) -> Result<Json<Menu>, ApiError> {
    Ok(Json(state.menu_service.get(&menu_id).await?))
}

/// POST /menu
pub async fn create_menu(
    State(state): State<AppState>,
    Json(request): Json<CreateMenuRequest>,
) -> Result<Json<Menu>, ApiError> {
    Ok(Json(state.menu_service.create(request).await?))
}

/// PATCH /menu/{menu_id}
pub async fn update_menu(
    State(state): State<AppState>,
    Path(menu_id): Path<String>,
    Json(request): Json<UpdateMenuRequest>,
) -> Result<Json<Menu>, ApiError> {
    Ok(Json(state.menu_service.update(&menu_id, request).await?))
}
