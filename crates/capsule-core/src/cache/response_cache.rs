use moka::future::Cache;
use std::{
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use crate::transport::Response;

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Longest TTL a cache accepts. Larger requests are clamped to it.
pub const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Time-bounded, capacity-bounded store of successful responses for one route.
///
/// Every instance gets a distinct `generation`, so a refresh is observable from logs even
/// though the slot is swapped by reference.
pub struct ResponseCache {
    entries: Cache<String, Arc<Response>>,
    ttl: Duration,
    generation: u64,
}

impl ResponseCache {
    /// Builds an empty cache. `ttl` is clamped to [`MAX_TTL`].
    #[must_use]
    pub fn new(ttl: Duration, max_entries: u64) -> Self {
        let ttl = ttl.min(MAX_TTL);
        Self {
            entries: Cache::builder().max_capacity(max_entries).time_to_live(ttl).build(),
            ttl,
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
        }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub async fn get(&self, key: &str) -> Option<Arc<Response>> {
        self.entries.get(key).await
    }

    pub async fn insert(&self, key: String, response: Arc<Response>) {
        self.entries.insert(key, response).await;
    }

    /// Number of live entries after pending evictions have been applied.
    pub async fn len(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Cache key for a request: the URL followed by its query pairs sorted by name.
    #[must_use]
    pub fn key_for(url: &str, query: &[(String, String)]) -> String {
        if query.is_empty() {
            return url.to_string();
        }
        let mut pairs: Vec<&(String, String)> = query.iter().collect();
        pairs.sort();
        let rendered: Vec<String> = pairs.iter().map(|(k, v)| format!("{k}={v}")).collect();
        format!("{url}?{}", rendered.join("&"))
    }
}

impl fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseCache")
            .field("generation", &self.generation)
            .field("ttl", &self.ttl)
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}
