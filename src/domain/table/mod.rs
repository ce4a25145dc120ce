//! Table domain

mod entity;

pub use entity::{TABLE_COLLECTION, Table};
