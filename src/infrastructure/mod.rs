//! Infrastructure layer - External service implementations

pub mod auth;
pub mod cache;
pub mod logging;
pub mod observability;
pub mod services;
pub mod store;
pub mod user;
