use crate::{cache::CacheOverride, headers::HeaderSource};

/// Per-call options for [`Capsule::request`](crate::Capsule::request).
///
/// ```
/// use capsule_core::dispatch::RequestOptions;
///
/// let options = RequestOptions::new().cache_for(60).full_result().header("X-Trace", "abc");
/// assert!(options.full_result);
/// ```
#[derive(Debug, Default)]
pub struct RequestOptions {
    /// `Ttl(n)` attaches a cache when none is active; `Bypass` skips the cache for this call.
    pub cache: Option<CacheOverride>,
    /// Replace the active cache with a fresh one before dispatching.
    pub force_update: bool,
    /// Resolve to the full response envelope instead of the body.
    pub full_result: bool,
    /// Merged into the shared default headers before the request is built.
    pub headers: Vec<(String, HeaderSource)>,
}

impl RequestOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn cache_for(mut self, seconds: u64) -> Self {
        self.cache = Some(CacheOverride::Ttl(seconds));
        self
    }

    #[must_use]
    pub fn no_cache(mut self) -> Self {
        self.cache = Some(CacheOverride::Bypass);
        self
    }

    #[must_use]
    pub fn force_update(mut self) -> Self {
        self.force_update = true;
        self
    }

    #[must_use]
    pub fn full_result(mut self) -> Self {
        self.full_result = true;
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<HeaderSource>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub(crate) fn bypasses_cache(&self) -> bool {
        matches!(self.cache, Some(CacheOverride::Bypass))
    }
}
