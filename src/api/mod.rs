//! API Module
//!
//! Operational HTTP surface consumed by uptime monitors and back-office tooling.
//!
//! # Endpoints
//! - `GET /health` - Liveness with database and cache status
//! - `POST /health` - Forced probe and expired-entry sweep
//! - `GET /stats` - Cache statistics
//! - `POST /cache/invalidate` - Scope or pattern invalidation

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
