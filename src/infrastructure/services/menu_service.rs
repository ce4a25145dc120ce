//! Menu service - CRUD operations for menus

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use super::updates::{FieldUpdates, find_by_id, update_by_id};
use crate::domain::DomainError;
use crate::domain::common::in_time_span;
use crate::domain::menu::{MENU_COLLECTION, Menu};
use crate::domain::store::{Collection, DocumentStore, Filter};

/// Request to create a new menu
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMenuRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Request to update an existing menu
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateMenuRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Menu service for CRUD operations
#[derive(Debug, Clone)]
pub struct MenuService {
    menus: Collection,
}

impl MenuService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            menus: Collection::new(store, MENU_COLLECTION),
        }
    }

    /// Overrides the per-call store deadline
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.menus = self.menus.with_deadline(deadline);
        self
    }

    pub async fn get(&self, id: &str) -> Result<Menu, DomainError> {
        find_by_id(&self.menus, "menu_id", id, "Menu").await
    }

    pub async fn list(&self) -> Result<Vec<Menu>, DomainError> {
        self.menus.find_all(&Filter::all()).await
    }

    pub async fn create(&self, request: CreateMenuRequest) -> Result<Menu, DomainError> {
        request.validate()?;

        let mut menu = Menu::new(request.name, request.category);
        menu.start_date = request.start_date;
        menu.end_date = request.end_date;

        self.menus.insert(&menu).await?;

        info!(menu_id = %menu.menu_id, "Menu created");
        Ok(menu)
    }

    /// Updates a menu. A new window, when both ends are given, must contain
    /// the current time.
    pub async fn update(&self, id: &str, request: UpdateMenuRequest) -> Result<Menu, DomainError> {
        request.validate()?;

        let mut updates = FieldUpdates::new();

        if let (Some(start), Some(end)) = (request.start_date, request.end_date) {
            if !in_time_span(start, end, Utc::now()) {
                return Err(DomainError::validation(
                    "start_date and end_date must enclose the current time",
                ));
            }

            updates.set("start_date", Some(start))?.set("end_date", Some(end))?;
        }

        updates
            .set("name", request.name)?
            .set("category", request.category)?;

        update_by_id(&self.menus, "menu_id", id, updates, "Menu").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::store::InMemoryDocumentStore;
    use chrono::Duration;

    fn create_service() -> MenuService {
        MenuService::new(Arc::new(InMemoryDocumentStore::new()))
    }

    fn lunch() -> CreateMenuRequest {
        CreateMenuRequest {
            name: "Lunch".to_string(),
            category: "Mains".to_string(),
            start_date: None,
            end_date: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let service = create_service();

        let menu = service.create(lunch()).await.unwrap();
        let fetched = service.get(&menu.menu_id).await.unwrap();

        assert_eq!(fetched, menu);
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_requires_name() {
        let service = create_service();
        let mut request = lunch();
        request.name = String::new();

        assert!(matches!(
            service.create(request).await,
            Err(DomainError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_get_missing() {
        assert!(matches!(
            create_service().get("nope").await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_window_must_enclose_now() {
        let service = create_service();
        let menu = service.create(lunch()).await.unwrap();
        let now = Utc::now();

        let result = service
            .update(
                &menu.menu_id,
                UpdateMenuRequest {
                    start_date: Some(now + Duration::days(1)),
                    end_date: Some(now + Duration::days(2)),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));

        let updated = service
            .update(
                &menu.menu_id,
                UpdateMenuRequest {
                    name: Some("Late Lunch".to_string()),
                    start_date: Some(now - Duration::hours(1)),
                    end_date: Some(now + Duration::hours(1)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Late Lunch");
        assert_eq!(updated.category, "Mains");
        assert!(updated.is_active_at(now));
    }

    #[tokio::test]
    async fn test_update_unknown_menu() {
        let result = create_service()
            .update("nope", UpdateMenuRequest::default())
            .await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }
}
