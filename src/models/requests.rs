//! Request DTOs for the operational API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::cache::InvalidationScope;

/// Request body for `POST /cache/invalidate`
///
/// Exactly one of `scope` or `pattern` must be given.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvalidateRequest {
    /// Named scope: products, orders, sales, analytics or all
    #[serde(default)]
    pub scope: Option<String>,
    /// Glob pattern, `*` matching any substring
    #[serde(default)]
    pub pattern: Option<String>,
}

/// What an invalidation request resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidationTarget {
    Scope(InvalidationScope),
    Pattern(String),
}

impl InvalidateRequest {
    /// Validates the request and resolves its target.
    pub fn target(&self) -> Result<InvalidationTarget, String> {
        match (self.scope.as_deref(), self.pattern.as_deref()) {
            (Some(_), Some(_)) => Err("Specify either scope or pattern, not both".to_string()),
            (None, None) => Err("Either scope or pattern is required".to_string()),
            (Some(scope), None) => InvalidationScope::parse(scope)
                .map(InvalidationTarget::Scope)
                .ok_or_else(|| format!("Unknown invalidation scope: {}", scope)),
            (None, Some("")) => Err("Pattern cannot be empty".to_string()),
            (None, Some(pattern)) => Ok(InvalidationTarget::Pattern(pattern.to_string())),
        }
    }
}
