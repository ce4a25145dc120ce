//! Document store domain - collections of JSON documents, filters and
//! aggregation pipelines

mod collection;
mod document;
mod filter;
mod pipeline;
mod repository;

pub use collection::{Collection, DEFAULT_STORE_DEADLINE};
pub use document::{Document, from_document, to_document};
pub use filter::Filter;
pub(crate) use pipeline::evaluate_stages;
pub use pipeline::{Accumulator, GroupStage, Pipeline, ProjectField, ProjectStage, Stage, slice};
pub use repository::{DocumentStore, UpdateOutcome};

#[cfg(test)]
pub use repository::MockDocumentStore;
