use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::generate_id;

pub const INVOICE_COLLECTION: &str = "invoice";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    Card,
    Cash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

/// Bill for an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub invoice_id: String,
    pub order_id: String,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    pub payment_status: PaymentStatus,
    pub payment_due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Days until an invoice without an explicit due date falls due
    pub const DEFAULT_DUE_DAYS: i64 = 1;

    pub fn new(order_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            invoice_id: generate_id(),
            order_id: order_id.into(),
            payment_method: None,
            payment_status: PaymentStatus::default(),
            payment_due_date: now + Duration::days(Self::DEFAULT_DUE_DAYS),
            created_at: now,
            updated_at: now,
        }
    }
}
