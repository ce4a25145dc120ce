//! Authentication infrastructure module
//!
//! HS256 access and refresh tokens for signed-in users.

mod jwt;

pub use jwt::{JwtClaims, JwtConfig, JwtGenerator, JwtService, TokenPair, TokenType};
