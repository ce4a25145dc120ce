//! Authentication API endpoints
//!
//! Sign-up and login are the only resource routes reachable without a token.

use axum::{Router, extract::State, routing::post};
use serde::Serialize;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::infrastructure::user::{AuthSession, LoginRequest, SignupRequest};

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

/// Issued token pair
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user_id: String,
    pub token: String,
    pub refresh_token: String,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            user_id: session.user.user_id,
            token: session.tokens.token,
            refresh_token: session.tokens.refresh_token,
        }
    }
}

/// Register a new user
///
/// POST /signup
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    debug!("Signing up user");

    let session = state.user_service.signup(request).await?;

    Ok(Json(session.into()))
}

/// Login with email and password
///
/// POST /login
///
/// Returns a fresh token pair; the previous pair stored on the user is replaced.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let session = state.user_service.login(request).await?;

    Ok(Json(session.into()))
}
