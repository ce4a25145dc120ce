//! Document store trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::{Document, Filter, Pipeline};
use crate::domain::DomainError;

/// Result of an update-by-filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Number of documents the filter matched (0 or 1)
    pub matched: u64,
}

/// Document database over named collections
///
/// Documents come back in insertion order.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Finds all documents matching the filter
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, DomainError>;

    /// Finds the first document matching the filter
    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Document>, DomainError>;

    /// Counts documents matching the filter
    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64, DomainError>;

    /// Runs an aggregation pipeline over the collection
    async fn aggregate(
        &self,
        collection: &str,
        pipeline: &Pipeline,
    ) -> Result<Vec<Document>, DomainError>;

    /// Inserts a single document
    async fn insert_one(&self, collection: &str, document: Document) -> Result<(), DomainError>;

    /// Inserts documents, returning how many were written
    async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> Result<u64, DomainError>;

    /// Merges `fields` into the first document matching the filter (`$set`)
    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        fields: Document,
    ) -> Result<UpdateOutcome, DomainError>;

    /// Deletes the first document matching the filter
    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<bool, DomainError>;

    /// Verifies the store is reachable
    async fn ping(&self) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_document_store() {
        let mut mock = MockDocumentStore::new();
        mock.expect_count()
            .withf(|collection, filter| collection == "food" && filter.is_empty())
            .times(1)
            .returning(|_, _| Ok(3));
        mock.expect_find_one()
            .returning(|_, _| Ok(json!({"food_id": "f1"}).as_object().cloned()));

        assert_eq!(mock.count("food", &Filter::all()).await.unwrap(), 3);

        let found = mock.find_one("food", &Filter::eq("food_id", "f1")).await.unwrap();
        assert!(found.is_some());
    }
}
