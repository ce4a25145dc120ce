//! Note service - notes attached to orders

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::info;
use validator::Validate;

use super::updates::{ensure_exists, find_by_id};
use crate::domain::DomainError;
use crate::domain::note::{NOTE_COLLECTION, Note};
use crate::domain::order::ORDER_COLLECTION;
use crate::domain::store::{Collection, DocumentStore, Filter};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateNoteRequest {
    #[validate(length(min = 1))]
    pub order_id: String,
    #[validate(length(min = 2, max = 100))]
    pub title: String,
    #[validate(length(min = 2))]
    pub note: String,
}

#[derive(Debug, Clone)]
pub struct NoteService {
    notes: Collection,
    orders: Collection,
}

impl NoteService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            notes: Collection::new(store.clone(), NOTE_COLLECTION),
            orders: Collection::new(store, ORDER_COLLECTION),
        }
    }

    /// Overrides the per-call store deadline
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.notes = self.notes.with_deadline(deadline);
        self.orders = self.orders.with_deadline(deadline);
        self
    }

    pub async fn get(&self, id: &str) -> Result<Note, DomainError> {
        find_by_id(&self.notes, "note_id", id, "Note").await
    }

    pub async fn list(&self) -> Result<Vec<Note>, DomainError> {
        self.notes.find_all(&Filter::all()).await
    }

    pub async fn create(&self, request: CreateNoteRequest) -> Result<Note, DomainError> {
        request.validate()?;
        ensure_exists(&self.orders, "order_id", &request.order_id, "Order").await?;

        let note = Note::new(request.order_id, request.title, request.note);
        self.notes.insert(&note).await?;

        info!(note_id = %note.note_id, order_id = %note.order_id, "Note created");
        Ok(note)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::Order;
    use crate::domain::store::to_document;
    use crate::infrastructure::store::InMemoryDocumentStore;
    use chrono::Utc;

    async fn service_with_order() -> (NoteService, Order) {
        let store = Arc::new(InMemoryDocumentStore::new());
        let order = Order::new("t1", Utc::now());
        store
            .insert_one(ORDER_COLLECTION, to_document(&order).unwrap())
            .await
            .unwrap();

        (NoteService::new(store), order)
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (service, order) = service_with_order().await;

        let note = service
            .create(CreateNoteRequest {
                order_id: order.order_id.clone(),
                title: "Allergy".to_string(),
                note: "No peanuts".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(note.text, "No peanuts");
        assert_eq!(service.get(&note.note_id).await.unwrap(), note);
        assert_eq!(service.list().await.unwrap(), vec![note]);
    }

    #[tokio::test]
    async fn test_short_note_rejected() {
        let (service, order) = service_with_order().await;

        let result = service
            .create(CreateNoteRequest {
                order_id: order.order_id,
                title: "Allergy".to_string(),
                note: "x".to_string(),
            })
            .await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }
}
