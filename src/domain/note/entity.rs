use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::generate_id;

pub const NOTE_COLLECTION: &str = "note";

/// Free-text note attached to an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub note_id: String,
    pub order_id: String,
    pub title: String,
    #[serde(rename = "note")]
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    pub fn new(order_id: impl Into<String>, title: impl Into<String>, text: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            note_id: generate_id(),
            order_id: order_id.into(),
            title: title.into(),
            text: text.into(),
            created_at: now,
            updated_at: now,
        }
    }
}
