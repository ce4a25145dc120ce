use axum::{Router, middleware, routing::get};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use super::auth;
use super::health;
use super::middleware::{
    logging_middleware, metrics_middleware, require_user, security_headers_middleware,
};
use super::resources;
use super::state::AppState;
use crate::infrastructure::observability::{PrometheusMetrics, create_metrics_router};

/// Create the full router with application state
///
/// Health probes, `/signup` and `/login` are public; every resource route
/// requires an access token.
pub fn create_router(state: AppState, metrics: Option<PrometheusMetrics>) -> Router {
    let protected = resources::create_resource_router()
        .route_layer(middleware::from_fn_with_state(state.clone(), require_user));

    let mut router = Router::new()
        // Health endpoints
        .route("/", get(health::ping))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Authentication endpoints (no token required)
        .merge(auth::create_auth_router())
        .merge(protected)
        .with_state(state)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

    if let Some(m) = metrics {
        router = router.merge(create_metrics_router(m));
    }

    router
}
