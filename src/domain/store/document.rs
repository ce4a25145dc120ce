//! Document representation

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::domain::DomainError;

/// A stored record: a JSON object keyed by top-level field names
pub type Document = Map<String, Value>;

/// Serializes an entity into a document
pub fn to_document<T: Serialize>(value: &T) -> Result<Document, DomainError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(DomainError::internal(format!(
            "Expected an object document, got {}",
            other
        ))),
        Err(e) => Err(DomainError::internal(format!(
            "Failed to serialize document: {}",
            e
        ))),
    }
}

/// Deserializes a document into an entity
pub fn from_document<T: DeserializeOwned>(document: Document) -> Result<T, DomainError> {
    serde_json::from_value(Value::Object(document))
        .map_err(|e| DomainError::storage(format!("Failed to deserialize document: {}", e)))
}
