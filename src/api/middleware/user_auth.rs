//! User authentication middleware using JWT tokens

use axum::{
    extract::{FromRequestParts, Request},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::infrastructure::auth::JwtClaims;

/// Header carrying the access token as issued by `/signup` and `/login`
pub const TOKEN_HEADER: &str = "token";

/// Extractor that requires a valid access token
///
/// The token is read from the `token` header, or from
/// `Authorization: Bearer <jwt_token>` when that header is absent.
#[derive(Debug, Clone)]
pub struct RequireUser(pub JwtClaims);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(claims) = parts.extensions.get::<JwtClaims>() {
            return Ok(RequireUser(claims.clone()));
        }

        let token = extract_jwt_token(&parts.headers)?;

        debug!("Validating JWT token");

        let claims = state
            .jwt_service
            .validate(&token)
            .map_err(|e| ApiError::unauthorized(format!("Invalid token: {}", e)))?;

        Ok(RequireUser(claims))
    }
}

/// Rejects unauthenticated requests and exposes the claims to handlers as an extension
pub async fn require_user(
    RequireUser(claims): RequireUser,
    mut request: Request,
    next: Next,
) -> Response {
    debug!(user_id = %claims.user_id(), "Authenticated request");
    request.extensions_mut().insert(claims);
    next.run(request).await
}

/// Extract the JWT token from the `token` or `Authorization` header
pub fn extract_jwt_token(headers: &HeaderMap) -> Result<String, ApiError> {
    if let Some(value) = headers.get(TOKEN_HEADER) {
        let token = value
            .to_str()
            .map_err(|_| ApiError::bad_request("Invalid token header encoding"))?
            .trim();

        if !token.is_empty() {
            return Ok(token.to_string());
        }
    }

    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| ApiError::bad_request("Invalid Authorization header encoding"))?;

        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            return Ok(token.trim().to_string());
        }
    }

    Err(ApiError::unauthorized(
        "No Authorization header provided. Send the access token in the 'token' header",
    ))
}
