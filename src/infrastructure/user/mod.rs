//! User infrastructure module
//!
//! Sign-up and login: Argon2 password hashing and token issuance.

mod password;
mod service;

pub use password::{Argon2Hasher, PasswordHasher};
pub use service::{AuthSession, LoginRequest, SignupRequest, UserService};
