use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Sizing for the response caches created at dispatch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of responses held by one route cache (default: 100)
    pub max_entries: u64,
    /// TTL used when a route declares `cache = true` or a refresh names no TTL (default: 300)
    pub default_ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { max_entries: 100, default_ttl_seconds: 300 }
    }
}

impl CacheConfig {
    #[must_use]
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_seconds)
    }
}
