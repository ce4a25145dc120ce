//! Food endpoints, including the cached paginated listing

use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::food::Food;
use crate::domain::listing::{PagePlan, PageResult};
use crate::infrastructure::services::{CreateFoodRequest, UpdateFoodRequest};

/// Raw listing parameters
///
/// Kept as strings: unparsable values fall back to defaults instead of
/// rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListFoodsQuery {
    #[serde(rename = "recordPerPage")]
    pub record_per_page: Option<String>,
    pub page: Option<String>,
    #[serde(rename = "startIndex")]
    pub start_index: Option<String>,
}

impl ListFoodsQuery {
    pub fn plan(&self) -> PagePlan {
        PagePlan::resolve(
            self.page.as_deref(),
            self.record_per_page.as_deref(),
            self.start_index.as_deref(),
        )
    }
}

/// GET /foods response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodListResponse {
    pub total_count: u64,
    pub food_items: Vec<Food>,
}

impl From<PageResult<Food>> for FoodListResponse {
    fn from(page: PageResult<Food>) -> Self {
        Self {
            total_count: page.total_count,
            food_items: page.items,
        }
    }
}

/// GET /foods
pub async fn list_foods(
    State(state): State<AppState>,
    Query(query): Query<ListFoodsQuery>,
) -> Result<Json<FoodListResponse>, ApiError> {
    let plan = query.plan();

    debug!(
        page = plan.page,
        per_page = plan.records_per_page,
        start_index = plan.start_index,
        "Listing foods"
    );

    let page = state.food_service.list(&plan).await?;

    Ok(Json(page.into()))
}

/// GET /food/{food_id}
pub async fn get_food(
    State(state): State<AppState>,
    Path(food_id): Path<String>,
) -> Result<Json<Food>, ApiError> {
    Ok(Json(state.food_service.get(&food_id).await?))
}

/// POST /food
pub async fn create_food(
    State(state): State<AppState>,
    Json(request): Json<CreateFoodRequest>,
) -> Result<Json<Food>, ApiError> {
    Ok(Json(state.food_service.create(request).await?))
}

/// PUT /food/{food_id}
pub async fn update_food(
    State(state): State<AppState>,
    Path(food_id): Path<String>,
    Json(request): Json<UpdateFoodRequest>,
) -> Result<Json<Food>, ApiError> {
    debug!(food_id = %food_id, "Updating food");

    Ok(Json(state.food_service.update(&food_id, request).await?))
}

/// DELETE /food/{food_id}
pub async fn delete_food(
    State(state): State<AppState>,
    Path(food_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.food_service.delete(&food_id).await?;

    Ok(Json(json!({ "deleted": true, "food_id": food_id })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_plan_defaults() {
        let plan = ListFoodsQuery::default().plan();

        assert_eq!(plan.page, 1);
        assert_eq!(plan.records_per_page, 10);
        assert_eq!(plan.start_index, 0);
    }

    #[test]
    fn test_query_plan_with_override() {
        let query = ListFoodsQuery {
            record_per_page: Some("10".to_string()),
            page: Some("3".to_string()),
            start_index: Some("5".to_string()),
        };

        assert_eq!(query.plan().start_index, 5);
    }

    #[test]
    fn test_query_plan_ignores_garbage() {
        let query = ListFoodsQuery {
            record_per_page: Some("many".to_string()),
            page: Some("-2".to_string()),
            start_index: Some("x".to_string()),
        };

        let plan = query.plan();
        assert_eq!((plan.page, plan.records_per_page, plan.start_index), (1, 10, 0));
    }

    #[test]
    fn test_list_response_field_names() {
        let response = FoodListResponse::from(PageResult::<Food>::empty());
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json, json!({ "total_count": 0, "food_items": [] }));
    }
}
