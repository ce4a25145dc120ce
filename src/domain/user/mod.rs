//! User domain
//!
//! Accounts that can sign in and receive API tokens.

mod entity;

pub use entity::{USER_COLLECTION, User};
