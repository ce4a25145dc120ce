//! Note domain

mod entity;

pub use entity::{NOTE_COLLECTION, Note};
