//! Partial updates: only supplied fields are written, plus `updated_at`

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::DomainError;
use crate::domain::store::{Collection, Document, Filter};

/// Accumulates the `$set` document for a partial update
#[derive(Debug, Default)]
pub(crate) struct FieldUpdates {
    fields: Document,
}

impl FieldUpdates {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Records `field` when a value was supplied
    pub(crate) fn set<V: Serialize>(
        &mut self,
        field: &str,
        value: Option<V>,
    ) -> Result<&mut Self, DomainError> {
        if let Some(value) = value {
            let value = serde_json::to_value(value).map_err(|e| {
                DomainError::internal(format!("Failed to encode field '{}': {}", field, e))
            })?;
            self.fields.insert(field.to_string(), value);
        }

        Ok(self)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The final document, stamped with the current `updated_at`
    pub(crate) fn into_document(mut self) -> Result<Document, DomainError> {
        self.set("updated_at", Some(Utc::now()))?;
        Ok(self.fields)
    }
}

/// Applies `updates` to the record whose `id_field` equals `id` and returns
/// the record as stored afterwards
pub(crate) async fn update_by_id<T: DeserializeOwned>(
    collection: &Collection,
    id_field: &str,
    id: &str,
    updates: FieldUpdates,
    kind: &str,
) -> Result<T, DomainError> {
    let filter = Filter::eq(id_field, id);
    let outcome = collection
        .update_one(&filter, updates.into_document()?)
        .await?;

    if outcome.matched == 0 {
        return Err(DomainError::not_found(format!("{} '{}' not found", kind, id)));
    }

    collection
        .find_one(&filter)
        .await?
        .ok_or_else(|| DomainError::not_found(format!("{} '{}' not found", kind, id)))
}

/// Loads the record whose `id_field` equals `id`
pub(crate) async fn find_by_id<T: DeserializeOwned>(
    collection: &Collection,
    id_field: &str,
    id: &str,
    kind: &str,
) -> Result<T, DomainError> {
    collection
        .find_one(&Filter::eq(id_field, id))
        .await?
        .ok_or_else(|| DomainError::not_found(format!("{} '{}' not found", kind, id)))
}

/// Fails with NotFound unless a record with `id_field == id` exists
pub(crate) async fn ensure_exists(
    collection: &Collection,
    id_field: &str,
    id: &str,
    kind: &str,
) -> Result<(), DomainError> {
    if collection.exists(&Filter::eq(id_field, id)).await? {
        Ok(())
    } else {
        Err(DomainError::not_found(format!("{} '{}' not found", kind, id)))
    }
}
