use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::generate_id;

pub const TABLE_COLLECTION: &str = "table";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub table_id: String,
    pub number_of_guests: u32,
    pub table_number: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Table {
    pub fn new(number_of_guests: u32, table_number: u32) -> Self {
        let now = Utc::now();
        Self {
            table_id: generate_id(),
            number_of_guests,
            table_number,
            created_at: now,
            updated_at: now,
        }
    }
}
