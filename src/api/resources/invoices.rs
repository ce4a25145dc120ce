//! Invoice endpoints
//!
//! Payment method and status are validated by their enum deserializers, so an
//! unknown value is rejected before it reaches the service.

use axum::extract::{Path, State};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::invoice::Invoice;
use crate::infrastructure::services::{CreateInvoiceRequest, UpdateInvoiceRequest};

/// GET /invoices
pub async fn list_invoices(State(state): State<AppState>) -> Result<Json<Vec<Invoice>>, ApiError> {
    Ok(Json(state.invoice_service.list().await?))
}

/// GET /invoice/{invoice_id}
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<String>,
) -> Result<Json<Invoice>, ApiError> {
    Ok(Json(state.invoice_service.get(&invoice_id).await?))
}

/// POST /invoice
pub async fn create_invoice(
    State(state): State<AppState>,
    Json(request): Json<CreateInvoiceRequest>,
) -> Result<Json<Invoice>, ApiError> {
    Ok(Json(state.invoice_service.create(request).await?))
}

/// PATCH /invoice/{invoice_id}
pub async fn update_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<String>,
    Json(request): Json<UpdateInvoiceRequest>,
) -> Result<Json<Invoice>, ApiError> {
    Ok(Json(state.invoice_service.update(&invoice_id, request).await?))
}
