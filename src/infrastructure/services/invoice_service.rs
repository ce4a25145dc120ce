//! Invoice service - CRUD operations for invoices

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use super::updates::{FieldUpdates, ensure_exists, find_by_id, update_by_id};
use crate::domain::DomainError;
use crate::domain::invoice::{INVOICE_COLLECTION, Invoice, PaymentMethod, PaymentStatus};
use crate::domain::order::ORDER_COLLECTION;
use crate::domain::store::{Collection, DocumentStore, Filter};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInvoiceRequest {
    #[validate(length(min = 1))]
    pub order_id: String,
    pub payment_method: Option<PaymentMethod>,
    pub payment_status: Option<PaymentStatus>,
    /// Defaults to one day after creation
    pub payment_due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateInvoiceRequest {
    pub payment_method: Option<PaymentMethod>,
    pub payment_status: Option<PaymentStatus>,
    pub payment_due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct InvoiceService {
    invoices: Collection,
    orders: Collection,
}

impl InvoiceService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            invoices: Collection::new(store.clone(), INVOICE_COLLECTION),
            orders: Collection::new(store, ORDER_COLLECTION),
        }
    }

    /// Overrides the per-call store deadline
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.invoices = self.invoices.with_deadline(deadline);
        self.orders = self.orders.with_deadline(deadline);
        self
    }

    pub async fn get(&self, id: &str) -> Result<Invoice, DomainError> {
        find_by_id(&self.invoices, "invoice_id", id, "Invoice").await
    }

    pub async fn list(&self) -> Result<Vec<Invoice>, DomainError> {
        self.invoices.find_all(&Filter::all()).await
    }

    pub async fn create(&self, request: CreateInvoiceRequest) -> Result<Invoice, DomainError> {
        request.validate()?;
        ensure_exists(&self.orders, "order_id", &request.order_id, "Order").await?;

        let mut invoice = Invoice::new(request.order_id);
        invoice.payment_method = request.payment_method;
        invoice.payment_status = request.payment_status.unwrap_or_default();
        if let Some(due) = request.payment_due_date {
            invoice.payment_due_date = due;
        }

        self.invoices.insert(&invoice).await?;

        info!(invoice_id = %invoice.invoice_id, order_id = %invoice.order_id, "Invoice created");
        Ok(invoice)
    }

    pub async fn update(
        &self,
        id: &str,
        request: UpdateInvoiceRequest,
    ) -> Result<Invoice, DomainError> {
        let mut updates = FieldUpdates::new();
        updates
            .set("payment_method", request.payment_method)?
            .set("payment_status", request.payment_status)?
            .set("payment_due_date", request.payment_due_date)?;

        update_by_id(&self.invoices, "invoice_id", id, updates, "Invoice").await
    }
}
