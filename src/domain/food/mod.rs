//! Food domain

mod entity;

pub use entity::{FOOD_COLLECTION, Food};
