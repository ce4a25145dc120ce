//! Application state for shared services

use std::sync::Arc;
use std::time::Duration;

use crate::domain::cache::Cache;
use crate::domain::listing::{ReadThroughCache, TtlPolicy};
use crate::domain::store::{DEFAULT_STORE_DEADLINE, DocumentStore};
use crate::infrastructure::auth::JwtGenerator;
use crate::infrastructure::services::{
    FoodService, InvoiceService, MenuService, NoteService, OrderItemService, OrderService,
    TableService,
};
use crate::infrastructure::user::{Argon2Hasher, UserService};

/// Cache lifetimes for cached reads and the deadline for every store call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListingOptions {
    pub ttl_policy: TtlPolicy,
    pub item_ttl: Duration,
    pub deadline: Duration,
}

impl Default for ListingOptions {
    fn default() -> Self {
        Self {
            ttl_policy: TtlPolicy::default(),
            item_ttl: FoodService::DEFAULT_ITEM_TTL,
            deadline: DEFAULT_STORE_DEADLINE,
        }
    }
}

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub food_service: Arc<FoodService>,
    pub menu_service: Arc<MenuService>,
    pub table_service: Arc<TableService>,
    pub order_service: Arc<OrderService>,
    pub order_item_service: Arc<OrderItemService>,
    pub invoice_service: Arc<InvoiceService>,
    pub note_service: Arc<NoteService>,
    pub user_service: Arc<UserService>,
    pub jwt_service: Arc<dyn JwtGenerator>,
    pub store: Arc<dyn DocumentStore>,
    pub cache: Option<Arc<dyn Cache>>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("food_service", &self.food_service)
            .field("user_service", &self.user_service)
            .field("jwt_service", &self.jwt_service)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Wires every service over one store; `cache == None` sends all reads to the store
    pub fn new(
        store: Arc<dyn DocumentStore>,
        cache: Option<Arc<dyn Cache>>,
        jwt_service: Arc<dyn JwtGenerator>,
        listing: ListingOptions,
    ) -> Self {
        let reader = ReadThroughCache::from_option(cache.clone())
            .with_policy(listing.ttl_policy)
            .with_deadline(listing.deadline);

        let deadline = listing.deadline;
        let order_service = OrderService::new(store.clone()).with_deadline(deadline);

        Self {
            food_service: Arc::new(
                FoodService::new(store.clone(), reader)
                    .with_item_ttl(listing.item_ttl)
                    .with_deadline(deadline),
            ),
            menu_service: Arc::new(MenuService::new(store.clone()).with_deadline(deadline)),
            table_service: Arc::new(TableService::new(store.clone()).with_deadline(deadline)),
            order_item_service: Arc::new(
                OrderItemService::new(store.clone(), order_service.clone()).with_deadline(deadline),
            ),
            order_service: Arc::new(order_service),
            invoice_service: Arc::new(InvoiceService::new(store.clone()).with_deadline(deadline)),
            note_service: Arc::new(NoteService::new(store.clone()).with_deadline(deadline)),
            user_service: Arc::new(
                UserService::new(
                    store.clone(),
                    Arc::new(Argon2Hasher::new()),
                    jwt_service.clone(),
                )
                .with_deadline(deadline),
            ),
            jwt_service,
            store,
            cache,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use crate::domain::store::{Document, Filter, Pipeline, UpdateOutcome};
    use crate::infrastructure::auth::{JwtConfig, JwtService};

    /// Store whose reads outlive any short deadline
    struct StalledStore;

    async fn stall() {
        tokio::time::sleep(Duration::from_millis(300)).await;
    }

    #[async_trait::async_trait]
    impl DocumentStore for StalledStore {
        async fn find(&self, _: &str, _: &Filter) -> Result<Vec<Document>, DomainError> {
            stall().await;
            Ok(Vec::new())
        }
        async fn find_one(&self, _: &str, _: &Filter) -> Result<Option<Document>, DomainError> {
            stall().await;
            Ok(None)
        }
        async fn count(&self, _: &str, _: &Filter) -> Result<u64, DomainError> {
            stall().await;
            Ok(0)
        }
        async fn aggregate(&self, _: &str, _: &Pipeline) -> Result<Vec<Document>, DomainError> {
            stall().await;
            Ok(Vec::new())
        }
        async fn insert_one(&self, _: &str, _: Document) -> Result<(), DomainError> {
            Ok(())
        }
        async fn insert_many(&self, _: &str, docs: Vec<Document>) -> Result<u64, DomainError> {
            Ok(docs.len() as u64)
        }
        async fn update_one(&self, _: &str, _: &Filter, _: Document) -> Result<UpdateOutcome, DomainError> {
            Ok(UpdateOutcome::default())
        }
        async fn delete_one(&self, _: &str, _: &Filter) -> Result<bool, DomainError> {
            Ok(false)
        }
        async fn ping(&self) -> Result<(), DomainError> {
            Ok(())
        }
    }

    fn stalled_state(deadline: Duration) -> AppState {
        AppState::new(
            Arc::new(StalledStore),
            None,
            Arc::new(JwtService::new(JwtConfig::new("state-test-secret"))),
            ListingOptions {
                deadline,
                ..Default::default()
            },
        )
    }

    fn assert_timeout<T: std::fmt::Debug>(result: Result<T, DomainError>) {
        match result {
            Err(e) => assert!(e.is_timeout(), "expected timeout, got {}", e),
            Ok(value) => panic!("expected timeout, got {:?}", value),
        }
    }

    #[tokio::test]
    async fn test_store_deadline_applies_to_every_service() {
        let state = stalled_state(Duration::from_millis(20));

        assert_timeout(state.menu_service.list().await);
        assert_timeout(state.table_service.list().await);
        assert_timeout(state.order_service.list().await);
        assert_timeout(state.order_item_service.list().await);
        assert_timeout(state.order_item_service.list_by_order("o1").await);
        assert_timeout(state.invoice_service.list().await);
        assert_timeout(state.note_service.list().await);
        assert_timeout(state.user_service.list().await);
        assert_timeout(state.user_service.get("u1").await);
    }

    #[tokio::test]
    async fn test_food_reads_surface_deadline_as_store_failure() {
        let state = stalled_state(Duration::from_millis(20));

        let result = state.food_service.list(&Default::default()).await;
        assert!(matches!(result, Err(DomainError::StoreQueryFailed { .. })));
    }
}
