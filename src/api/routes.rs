//! API Routes
//!
//! Configures the Axum router with the operational endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    health_check_handler, health_handler, invalidate_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Liveness with database and cache status
/// - `POST /health` - Forced probe and expired-entry sweep
/// - `GET /stats` - Cache statistics
/// - `POST /cache/invalidate` - Scope or pattern invalidation
///
/// # Middleware
/// - CORS: Allows any origin so uptime dashboards can poll directly
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler).post(health_check_handler))
        .route("/stats", get(stats_handler))
        .route("/cache/invalidate", post(invalidate_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
