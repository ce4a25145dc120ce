//! Invoice domain

mod entity;

pub use entity::{INVOICE_COLLECTION, Invoice, PaymentMethod, PaymentStatus};
