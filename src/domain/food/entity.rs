use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::{generate_id, round_to};

pub const FOOD_COLLECTION: &str = "food";

/// A priced dish belonging to a menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub food_id: String,
    pub name: String,
    pub price: f64,
    pub food_image: String,
    pub menu_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Food {
    /// Creates a food item; the price is rounded to cents
    pub fn new(
        name: impl Into<String>,
        price: f64,
        food_image: impl Into<String>,
        menu_id: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            food_id: generate_id(),
            name: name.into(),
            price: Self::round_price(price),
            food_image: food_image.into(),
            menu_id: menu_id.into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn round_price(price: f64) -> f64 {
        round_to(price, 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_is_rounded() {
        let food = Food::new("Soup", 4.499, "soup.png", "m1");
        assert_eq!(food.price, 4.5);
        assert_eq!(food.menu_id, "m1");
    }

    #[test]
    fn test_round_trip() {
        let food = Food::new("Soup", 4.5, "soup.png", "m1");
        let json = serde_json::to_string(&food).unwrap();
        let back: Food = serde_json::from_str(&json).unwrap();
        assert_eq!(back, food);
    }
}
