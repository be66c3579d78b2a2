//! Pattern Invalidation Module
//!
//! Glob-style bulk removal of cache keys. `*` matches any substring; every
//! other character matches itself.

use regex::Regex;
use tracing::{info, warn};

use crate::cache::CacheStore;

// == Key Pattern ==
/// A glob pattern compiled to an anchored regular expression.
#[derive(Debug, Clone)]
pub struct KeyPattern {
    glob: String,
    regex: Regex,
}

impl KeyPattern {
    /// Compiles `glob`. Returns `None` only if the resulting expression exceeds
    /// the regex engine's size limits.
    pub fn new(glob: &str) -> Option<Self> {
        let body = glob
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");

        match Regex::new(&format!("^{}$", body)) {
            Ok(regex) => Some(Self {
                glob: glob.to_string(),
                regex,
            }),
            Err(err) => {
                warn!("Rejected cache key pattern '{}': {}", glob, err);
                None
            }
        }
    }

    /// Whether `key` matches the whole pattern.
    pub fn matches(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }

    pub fn as_str(&self) -> &str {
        &self.glob
    }
}

impl<V: Clone> CacheStore<V> {
    // == Invalidate ==
    /// Deletes every key fully matching `pattern`. Returns the number removed.
    pub fn invalidate(&mut self, pattern: &str) -> usize {
        let Some(pattern) = KeyPattern::new(pattern) else {
            return 0;
        };
        let removed = self.remove_where(|key| pattern.matches(key));
        info!(
            "Invalidated {} cache entries matching pattern: {}",
            removed,
            pattern.as_str()
        );
        removed
    }
}

// == Named Scopes ==
/// Fixed invalidation scopes used by domain collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidationScope {
    Products,
    Orders,
    Sales,
    Analytics,
    All,
}

impl InvalidationScope {
    /// Glob patterns covered by this scope. `All` clears unconditionally and has none.
    pub fn patterns(self) -> &'static [&'static str] {
        match self {
            InvalidationScope::Products => &["products*", "product:*"],
            InvalidationScope::Orders => &["orders*", "order:*"],
            InvalidationScope::Sales => &["sales*"],
            InvalidationScope::Analytics => &["analytics*"],
            InvalidationScope::All => &[],
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "products" => Some(InvalidationScope::Products),
            "orders" => Some(InvalidationScope::Orders),
            "sales" => Some(InvalidationScope::Sales),
            "analytics" => Some(InvalidationScope::Analytics),
            "all" => Some(InvalidationScope::All),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InvalidationScope::Products => "products",
            InvalidationScope::Orders => "orders",
            InvalidationScope::Sales => "sales",
            InvalidationScope::Analytics => "analytics",
            InvalidationScope::All => "all",
        }
    }
}

impl<V: Clone> CacheStore<V> {
    /// Invalidates a named scope. Returns the number of entries removed.
    pub fn invalidate_scope(&mut self, scope: InvalidationScope) -> usize {
        if scope == InvalidationScope::All {
            return self.clear();
        }
        scope
            .patterns()
            .iter()
            .map(|pattern| self.invalidate(pattern))
            .sum()
    }
}
