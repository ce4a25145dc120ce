use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::generate_id;

pub const ORDER_COLLECTION: &str = "order";

/// An order placed at a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub order_date: DateTime<Utc>,
    pub table_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn new(table_id: impl Into<String>, order_date: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            order_id: generate_id(),
            order_date,
            table_id: table_id.into(),
            created_at: now,
            updated_at: now,
        }
    }
}
