//! API Handlers
//!
//! HTTP request handlers for the operational endpoints.

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, http::StatusCode, Json};
use tokio::time::Instant;

use crate::cache::{Cache, CacheStats};
use crate::config::Config;
use crate::error::ApiError;
use crate::models::{
    HealthCheckCompleted, HealthResponse, InvalidateRequest, InvalidateResponse,
    InvalidationTarget,
};
use crate::resilience::{HealthMonitor, Probe};

/// Application state shared across all handlers.
///
/// Holds the one cache and health monitor of the process; collaborators
/// receive clones of the same handles.
#[derive(Clone)]
pub struct AppState {
    /// Shared cache handle
    pub cache: Cache,
    /// Backing-store health monitor
    pub health: Arc<HealthMonitor>,
    /// Bound for the quick probe behind `GET /health`
    pub probe_timeout: Duration,
}

impl AppState {
    /// Creates a new AppState from already constructed services.
    pub fn new(cache: Cache, health: Arc<HealthMonitor>, probe_timeout: Duration) -> Self {
        Self {
            cache,
            health,
            probe_timeout,
        }
    }

    /// Creates a new AppState from configuration and a backing-store probe.
    pub fn from_config(config: &Config, probe: Arc<dyn Probe>) -> Self {
        Self::new(
            Cache::from_config(config),
            Arc::new(HealthMonitor::from_config(config, probe)),
            config.probe_timeout(),
        )
    }
}

/// Handler for GET /health
///
/// Runs a bounded quick probe and reports it alongside the retained snapshot
/// and cache occupancy. 503 when the store is unreachable.
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let start = Instant::now();

    let connected = state.health.quick_connection_test(state.probe_timeout).await;
    let last = state.health.last_snapshot().await;
    let stats = state.cache.stats().await;

    let response_time = start.elapsed().as_millis() as u64;
    let status = if connected {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse::new(
            connected,
            response_time,
            last.as_ref(),
            &stats,
        )),
    )
}

/// Handler for POST /health
///
/// Forces a fresh probe and an expired-entry sweep.
pub async fn health_check_handler(State(state): State<AppState>) -> Json<HealthCheckCompleted> {
    let snapshot = state.health.check_connection().await;
    let removed = state.cache.cleanup().await;
    let stats = state.cache.stats().await;

    Json(HealthCheckCompleted::new(&snapshot, removed, stats))
}

/// Handler for GET /stats
///
/// Returns current cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.stats().await)
}

/// Handler for POST /cache/invalidate
///
/// Removes the entries of a named scope or matching a glob pattern.
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Json(req): Json<InvalidateRequest>,
) -> Result<Json<InvalidateResponse>, ApiError> {
    let target = req.target().map_err(ApiError::InvalidRequest)?;

    let response = match target {
        InvalidationTarget::Scope(scope) => InvalidateResponse {
            target: scope.as_str().to_string(),
            removed: state.cache.invalidate_scope(scope).await,
        },
        InvalidationTarget::Pattern(pattern) => InvalidateResponse {
            removed: state.cache.invalidate(&pattern).await,
            target: pattern,
        },
    };

    Ok(Json(response))
}
