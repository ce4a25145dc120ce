//! Order and order item domain

mod entity;
mod item;

pub use entity::{ORDER_COLLECTION, Order};
pub use item::{ORDER_ITEM_COLLECTION, OrderItem, Portion};
