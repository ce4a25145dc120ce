//! Menu domain

mod entity;

pub use entity::{MENU_COLLECTION, Menu};
