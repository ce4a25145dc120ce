//! Equality filters over top-level document fields

use std::collections::BTreeMap;

use serde_json::Value;

use super::Document;

/// Conjunction of `field == value` conditions; the empty filter matches
/// every document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: BTreeMap<String, Value>,
}

impl Filter {
    /// A filter matching all documents
    pub fn all() -> Self {
        Self::default()
    }

    /// A filter with a single equality condition
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::all().and(field, value)
    }

    /// Adds an equality condition, replacing any earlier condition on the same field
    pub fn and(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.insert(field.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn conditions(&self) -> &BTreeMap<String, Value> {
        &self.conditions
    }

    /// Whether the document satisfies every condition
    pub fn matches(&self, document: &Document) -> bool {
        self.conditions
            .iter()
            .all(|(field, expected)| document.get(field) == Some(expected))
    }

    /// The filter as a JSON object, suitable for containment queries
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.conditions
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = Filter::all();
        assert!(filter.is_empty());
        assert!(filter.matches(&doc(json!({"a": 1}))));
        assert!(filter.matches(&Document::new()));
    }

    #[test]
    fn test_equality_conditions() {
        let filter = Filter::eq("menu_id", "m1").and("name", "Soup");

        assert!(filter.matches(&doc(json!({"menu_id": "m1", "name": "Soup", "price": 3.0}))));
        assert!(!filter.matches(&doc(json!({"menu_id": "m1", "name": "Salad"}))));
        assert!(!filter.matches(&doc(json!({"name": "Soup"}))));
    }

    #[test]
    fn test_to_json() {
        let filter = Filter::eq("food_id", "f1");
        assert_eq!(filter.to_json(), json!({"food_id": "f1"}));
        assert_eq!(Filter::all().to_json(), json!({}));
    }
}
