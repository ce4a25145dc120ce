use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::{generate_id, round_to};

pub const ORDER_ITEM_COLLECTION: &str = "orderItem";

/// Portion size of an ordered dish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Portion {
    #[serde(rename = "S")]
    Small,
    #[serde(rename = "M")]
    Medium,
    #[serde(rename = "L")]
    Large,
}

impl fmt::Display for Portion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Portion::Small => write!(f, "S"),
            Portion::Medium => write!(f, "M"),
            Portion::Large => write!(f, "L"),
        }
    }
}

/// One dish within an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub order_item_id: String,
    pub order_id: String,
    pub food_id: String,
    pub quantity: Portion,
    pub unit_price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderItem {
    /// Creates an item; the unit price is rounded to cents
    pub fn new(
        order_id: impl Into<String>,
        food_id: impl Into<String>,
        quantity: Portion,
        unit_price: f64,
    ) -> Self {
        let now = Utc::now();
        Self {
            order_item_id: generate_id(),
            order_id: order_id.into(),
            food_id: food_id.into(),
            quantity,
            unit_price: round_to(unit_price, 2),
            created_at: now,
            updated_at: now,
        }
    }
}
