use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::{generate_id, in_time_span};

pub const MENU_COLLECTION: &str = "menu";

/// A named, categorized menu with an optional validity window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    pub menu_id: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Menu {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            menu_id: generate_id(),
            name: name.into(),
            category: category.into(),
            start_date: None,
            end_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_window(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    /// Whether the menu is currently within its validity window; a menu
    /// without a window is always active
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => in_time_span(start, end, at),
            _ => true,
        }
    }
}
