//! Response DTOs for the operational API
//!
//! Defines the structure of outgoing HTTP response bodies. Field names are
//! camelCase to match what uptime monitors already consume.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::CacheStats;
use crate::resilience::HealthSnapshot;

/// Response body for `GET /health`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// "healthy" or "unhealthy"
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
    /// Time spent building this response, in milliseconds
    pub response_time: u64,
    pub database: DatabaseStatus,
    pub cache: CacheSummary,
    pub services: ServiceStatus,
}

impl HealthResponse {
    pub fn new(
        connected: bool,
        response_time: u64,
        last: Option<&HealthSnapshot>,
        stats: &CacheStats,
    ) -> Self {
        Self {
            status: health_label(connected).to_string(),
            timestamp: Utc::now().to_rfc3339(),
            response_time,
            database: DatabaseStatus::new(connected, last),
            cache: CacheSummary::from(stats),
            services: ServiceStatus::new(connected),
        }
    }
}

fn health_label(healthy: bool) -> &'static str {
    if healthy {
        "healthy"
    } else {
        "unhealthy"
    }
}

/// Live connectivity plus the retained snapshot
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseStatus {
    pub connected: bool,
    pub last_check: Option<DateTime<Utc>>,
    pub last_latency: Option<u64>,
    pub last_error: Option<String>,
}

impl DatabaseStatus {
    pub fn new(connected: bool, last: Option<&HealthSnapshot>) -> Self {
        Self {
            connected,
            last_check: last.map(|s| s.timestamp),
            last_latency: last.map(|s| s.latency_ms),
            last_error: last.and_then(|s| s.error.clone()),
        }
    }
}

/// Cache occupancy as reported on the health endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheSummary {
    pub total: usize,
    pub active: usize,
    pub expired: usize,
    pub max_size: usize,
    /// Percentage string, e.g. "83.3%"
    pub hit_rate: String,
}

impl From<&CacheStats> for CacheSummary {
    fn from(stats: &CacheStats) -> Self {
        Self {
            total: stats.total,
            active: stats.active,
            expired: stats.expired,
            max_size: stats.max_size,
            hit_rate: stats.hit_rate_percent(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    pub api: String,
    pub database: String,
    pub cache: String,
}

impl ServiceStatus {
    pub fn new(database_connected: bool) -> Self {
        Self {
            api: "healthy".to_string(),
            database: health_label(database_connected).to_string(),
            cache: "healthy".to_string(),
        }
    }
}

/// Response body for `POST /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthCheckCompleted {
    pub status: String,
    pub timestamp: String,
    pub database: DatabaseCheck,
    pub cache: CacheCleanup,
}

impl HealthCheckCompleted {
    pub fn new(snapshot: &HealthSnapshot, removed: usize, stats: CacheStats) -> Self {
        Self {
            status: "health_check_completed".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            database: DatabaseCheck {
                healthy: snapshot.is_healthy,
                latency: snapshot.latency_ms,
                error: snapshot.error.clone(),
            },
            cache: CacheCleanup {
                cleaned: true,
                removed,
                stats,
            },
        }
    }
}

/// Result of the forced probe
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseCheck {
    pub healthy: bool,
    pub latency: u64,
    pub error: Option<String>,
}

/// Result of the forced sweep
#[derive(Debug, Clone, Serialize)]
pub struct CacheCleanup {
    pub cleaned: bool,
    pub removed: usize,
    pub stats: CacheStats,
}

/// Response body for `POST /cache/invalidate`
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    /// Scope name or glob pattern that was applied
    pub target: String,
    /// Number of entries removed
    pub removed: usize,
}
