//! Collection handle: a named collection with a per-call deadline

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use super::{Document, DocumentStore, Filter, Pipeline, UpdateOutcome, from_document, to_document};
use crate::domain::DomainError;

/// Deadline applied to each store call unless overridden
pub const DEFAULT_STORE_DEADLINE: Duration = Duration::from_secs(100);

/// Typed access to one collection of a [`DocumentStore`]
///
/// Every call runs under the handle's deadline. A call that exceeds it is
/// abandoned and surfaces as [`DomainError::Timeout`]; it is never retried.
#[derive(Clone)]
pub struct Collection {
    store: Arc<dyn DocumentStore>,
    name: String,
    deadline: Duration,
}

impl std::fmt::Debug for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("name", &self.name)
            .field("deadline", &self.deadline)
            .finish()
    }
}

impl Collection {
    pub fn new(store: Arc<dyn DocumentStore>, name: impl Into<String>) -> Self {
        Self {
            store,
            name: name.into(),
            deadline: DEFAULT_STORE_DEADLINE,
        }
    }

    /// Returns a handle with a different per-call deadline
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    async fn bounded<T, F>(&self, operation: &str, call: F) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, DomainError>>,
    {
        match tokio::time::timeout(self.deadline, call).await {
            Ok(result) => result,
            Err(_) => {
                let operation = format!("{} {}", operation, self.name);
                warn!(operation = %operation, deadline_secs = self.deadline.as_secs(), "Store call timed out");
                Err(DomainError::timeout(operation, self.deadline))
            }
        }
    }

    pub async fn find_all<T: DeserializeOwned>(&self, filter: &Filter) -> Result<Vec<T>, DomainError> {
        let documents = self
            .bounded("find", self.store.find(&self.name, filter))
            .await?;

        documents.into_iter().map(from_document).collect()
    }

    pub async fn find_one<T: DeserializeOwned>(&self, filter: &Filter) -> Result<Option<T>, DomainError> {
        self.bounded("find_one", self.store.find_one(&self.name, filter))
            .await?
            .map(from_document)
            .transpose()
    }

    pub async fn exists(&self, filter: &Filter) -> Result<bool, DomainError> {
        Ok(self.count(filter).await? > 0)
    }

    pub async fn count(&self, filter: &Filter) -> Result<u64, DomainError> {
        self.bounded("count", self.store.count(&self.name, filter))
            .await
    }

    pub async fn aggregate(&self, pipeline: &Pipeline) -> Result<Vec<Document>, DomainError> {
        self.bounded("aggregate", self.store.aggregate(&self.name, pipeline))
            .await
    }

    pub async fn insert<T: Serialize>(&self, entity: &T) -> Result<(), DomainError> {
        let document = to_document(entity)?;
        self.bounded("insert_one", self.store.insert_one(&self.name, document))
            .await
    }

    pub async fn insert_many<T: Serialize>(&self, entities: &[T]) -> Result<u64, DomainError> {
        let documents = entities
            .iter()
            .map(to_document)
            .collect::<Result<Vec<_>, _>>()?;

        self.bounded("insert_many", self.store.insert_many(&self.name, documents))
            .await
    }

    /// Applies `$set` semantics with the given fields to the first match
    pub async fn update_one(
        &self,
        filter: &Filter,
        fields: Document,
    ) -> Result<UpdateOutcome, DomainError> {
        self.bounded("update_one", self.store.update_one(&self.name, filter, fields))
            .await
    }

    pub async fn delete_one(&self, filter: &Filter) -> Result<bool, DomainError> {
        self.bounded("delete_one", self.store.delete_one(&self.name, filter))
            .await
    }
}
