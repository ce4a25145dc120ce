//! Count-and-slice aggregation used to answer one page in a single round trip
//!
//! The pipeline materializes the entire match set inside one grouped
//! document before slicing, so memory grows with the collection size. That
//! is acceptable for menu-sized collections.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::PageResult;
use crate::domain::DomainError;
use crate::domain::store::{
    Accumulator, Document, Filter, GroupStage, Pipeline, ProjectStage, Stage,
};

pub const TOTAL_COUNT_FIELD: &str = "total_count";
const DATA_FIELD: &str = "data";

/// Builds `match -> group(total_count, data) -> project(total_count, items_field)`
///
/// `items_field` receives `data[start_index .. start_index + limit]`.
pub fn page_pipeline(filter: Filter, start_index: i64, limit: i64, items_field: &str) -> Pipeline {
    Pipeline::new()
        .with_stage(Stage::Match(filter))
        .with_stage(Stage::Group(
            GroupStage::new()
                .with(TOTAL_COUNT_FIELD, Accumulator::Count)
                .with(DATA_FIELD, Accumulator::PushRoot),
        ))
        .with_stage(Stage::Project(
            ProjectStage::new()
                .include(TOTAL_COUNT_FIELD)
                .slice(items_field, DATA_FIELD, start_index, limit),
        ))
}

/// Turns the aggregation output into a page
///
/// An empty match set makes the group stage emit nothing; that maps to the
/// zero page rather than an error.
pub fn decode_page<T: DeserializeOwned>(
    rows: Vec<Document>,
    items_field: &str,
) -> Result<PageResult<T>, DomainError> {
    let Some(mut row) = rows.into_iter().next() else {
        return Ok(PageResult::empty());
    };

    let total_count = row
        .get(TOTAL_COUNT_FIELD)
        .and_then(Value::as_u64)
        .ok_or_else(|| {
            DomainError::storage(format!("Aggregation result is missing '{}'", TOTAL_COUNT_FIELD))
        })?;

    let items = match row.remove(items_field) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(values)) => values
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<T>, _>>()
            .map_err(|e| DomainError::storage(format!("Failed to decode page items: {}", e)))?,
        Some(other) => {
            return Err(DomainError::storage(format!(
                "Aggregation field '{}' is not an array: {}",
                items_field, other
            )));
        }
    };

    Ok(PageResult { total_count, items })
}
