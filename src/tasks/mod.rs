//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - TTL Cleanup: Removes expired cache entries at configured intervals
//! - Health Check: Refreshes the retained database health snapshot

mod cleanup;
mod health_check;

pub use cleanup::spawn_cleanup_task;
pub use health_check::spawn_health_check_task;
