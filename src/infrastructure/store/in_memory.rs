//! In-memory document store

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::DomainError;
use crate::domain::store::{Document, DocumentStore, Filter, Pipeline, UpdateOutcome};

/// Thread-safe in-memory document store
///
/// Each collection is a vector kept in insertion order. Useful for testing
/// and development. Data is lost when the process terminates.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with one collection pre-populated
    pub fn with_documents(collection: &str, documents: Vec<Document>) -> Self {
        let mut collections = HashMap::new();
        collections.insert(collection.to_string(), documents);

        Self {
            collections: RwLock::new(collections),
        }
    }

    fn read<T>(
        &self,
        collection: &str,
        f: impl FnOnce(&[Document]) -> T,
    ) -> Result<T, DomainError> {
        let collections = self
            .collections
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(f(collections
            .get(collection)
            .map(Vec::as_slice)
            .unwrap_or_default()))
    }

    fn write<T>(
        &self,
        collection: &str,
        f: impl FnOnce(&mut Vec<Document>) -> T,
    ) -> Result<T, DomainError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(f(collections.entry(collection.to_string()).or_default()))
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, DomainError> {
        self.read(collection, |docs| {
            docs.iter()
                .filter(|doc| filter.matches(doc))
                .cloned()
                .collect()
        })
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Document>, DomainError> {
        self.read(collection, |docs| {
            docs.iter().find(|doc| filter.matches(doc)).cloned()
        })
    }

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64, DomainError> {
        self.read(collection, |docs| {
            docs.iter().filter(|doc| filter.matches(doc)).count() as u64
        })
    }

    async fn aggregate(
        &self,
        collection: &str,
        pipeline: &Pipeline,
    ) -> Result<Vec<Document>, DomainError> {
        let documents = self.read(collection, |docs| docs.to_vec())?;
        pipeline.evaluate(documents)
    }

    async fn insert_one(&self, collection: &str, document: Document) -> Result<(), DomainError> {
        self.write(collection, |docs| docs.push(document))
    }

    async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> Result<u64, DomainError> {
        let inserted = documents.len() as u64;
        self.write(collection, |docs| docs.extend(documents))?;
        Ok(inserted)
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        fields: Document,
    ) -> Result<UpdateOutcome, DomainError> {
        self.write(collection, |docs| {
            match docs.iter_mut().find(|doc| filter.matches(doc)) {
                Some(doc) => {
                    doc.extend(fields);
                    UpdateOutcome { matched: 1 }
                }
                None => UpdateOutcome::default(),
            }
        })
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<bool, DomainError> {
        self.write(collection, |docs| {
            match docs.iter().position(|doc| filter.matches(doc)) {
                Some(index) => {
                    docs.remove(index);
                    true
                }
                None => false,
            }
        })
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
