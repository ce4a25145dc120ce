//! Food service - CRUD for dishes plus the cached paginated listing

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};
use validator::Validate;

use super::updates::{FieldUpdates, ensure_exists, update_by_id};
use crate::domain::food::{FOOD_COLLECTION, Food};
use crate::domain::listing::{PagePlan, PageResult, ReadThroughCache, decode_page, page_pipeline};
use crate::domain::menu::MENU_COLLECTION;
use crate::domain::store::{Collection, DocumentStore, Filter};
use crate::domain::DomainError;

/// Request to create a food item
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateFoodRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(length(min = 1))]
    pub food_image: String,
    #[validate(length(min = 1))]
    pub menu_id: String,
}

/// Request to update a food item; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateFoodRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[validate(length(min = 1))]
    pub food_image: Option<String>,
    #[validate(length(min = 1))]
    pub menu_id: Option<String>,
}

/// Food service
///
/// Listings and single-item reads go through the read-through cache. Writes
/// do not invalidate cached entries; they age out with their TTL.
#[derive(Debug, Clone)]
pub struct FoodService {
    foods: Collection,
    menus: Collection,
    reader: ReadThroughCache,
    item_ttl: Duration,
}

impl FoodService {
    /// Cache namespace for listing pages
    pub const LIST_NAMESPACE: &'static str = "foods";
    /// Field of the aggregation output that holds the page's records
    pub const ITEMS_FIELD: &'static str = "food_items";
    pub const DEFAULT_ITEM_TTL: Duration = Duration::from_secs(600);

    pub fn new(store: Arc<dyn DocumentStore>, reader: ReadThroughCache) -> Self {
        Self {
            foods: Collection::new(store.clone(), FOOD_COLLECTION),
            menus: Collection::new(store, MENU_COLLECTION),
            reader,
            item_ttl: Self::DEFAULT_ITEM_TTL,
        }
    }

    pub fn with_item_ttl(mut self, ttl: Duration) -> Self {
        self.item_ttl = ttl;
        self
    }

    /// Overrides the per-call store deadline
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.foods = self.foods.with_deadline(deadline);
        self.menus = self.menus.with_deadline(deadline);
        self
    }

    /// Cache key of a single food item
    pub fn item_key(id: &str) -> String {
        format!("food:{}", id)
    }

    /// Returns one page of foods, from the cache when a fresh entry exists
    pub async fn list(&self, plan: &PagePlan) -> Result<PageResult<Food>, DomainError> {
        let key = plan.cache_key(Self::LIST_NAMESPACE);
        let pipeline = page_pipeline(
            Filter::all(),
            plan.start_index,
            plan.records_per_page,
            Self::ITEMS_FIELD,
        );

        debug!(key = %key, "Listing foods");

        self.reader
            .get_page(&key, || async {
                let rows = self.foods.aggregate(&pipeline).await?;
                decode_page(rows, Self::ITEMS_FIELD)
            })
            .await
    }

    /// Gets a food item by ID, cached for the item TTL
    pub async fn get(&self, id: &str) -> Result<Food, DomainError> {
        let filter = Filter::eq("food_id", id);

        self.reader
            .get_with_ttl(&Self::item_key(id), self.item_ttl, || {
                self.foods.find_one(&filter)
            })
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Food '{}' not found", id)))
    }

    pub async fn create(&self, request: CreateFoodRequest) -> Result<Food, DomainError> {
        request.validate()?;
        ensure_exists(&self.menus, "menu_id", &request.menu_id, "Menu").await?;

        let food = Food::new(
            request.name,
            request.price,
            request.food_image,
            request.menu_id,
        );
        self.foods.insert(&food).await?;

        info!(food_id = %food.food_id, menu_id = %food.menu_id, "Food created");
        Ok(food)
    }

    pub async fn update(&self, id: &str, request: UpdateFoodRequest) -> Result<Food, DomainError> {
        request.validate()?;

        if let Some(menu_id) = &request.menu_id {
            ensure_exists(&self.menus, "menu_id", menu_id, "Menu").await?;
        }

        let mut updates = FieldUpdates::new();
        updates
            .set("name", request.name)?
            .set("price", request.price.map(Food::round_price))?
            .set("food_image", request.food_image)?
            .set("menu_id", request.menu_id)?;

        update_by_id(&self.foods, "food_id", id, updates, "Food").await
    }

    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        if self.foods.delete_one(&Filter::eq("food_id", id)).await? {
            info!(food_id = %id, "Food deleted");
            Ok(())
        } else {
            Err(DomainError::not_found(format!("Food '{}' not found", id)))
        }
    }
}
