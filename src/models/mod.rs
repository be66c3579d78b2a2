//! Request and Response models for the operational API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{InvalidateRequest, InvalidationTarget};
pub use responses::{
    CacheCleanup, CacheSummary, DatabaseCheck, DatabaseStatus, HealthCheckCompleted,
    HealthResponse, InvalidateResponse, ServiceStatus,
};
