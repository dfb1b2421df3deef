//! Cache-state transition for a single dispatch.

use std::time::Duration;

use crate::route::CachePolicy;

/// Per-call cache instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOverride {
    /// Cache responses for this many seconds. `0` is treated as "not requested".
    Ttl(u64),
    /// Skip the cache for this call, both lookup and store.
    Bypass,
}

impl CacheOverride {
    /// The TTL this override asks for, if it asks for one.
    #[must_use]
    pub fn ttl(&self) -> Option<Duration> {
        match self {
            Self::Ttl(0) | Self::Bypass => None,
            Self::Ttl(secs) => Some(Duration::from_secs(*secs)),
        }
    }
}

/// What a dispatch does to the route's cache slot before the request is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheTransition {
    /// Leave the slot as it is.
    Keep,
    /// The slot is empty and the call asked for caching: install a new cache.
    Attach(Duration),
    /// The slot is occupied and the call forced an update: replace the cache.
    Refresh(Duration),
}

/// Decides the transition for one call.
///
/// - `Attach` when no cache is active and `requested` carries a positive TTL.
/// - `Refresh` when a cache is active and `force_update` is set. The TTL comes from `requested`,
///   then the route's declared policy, then `default_ttl`.
/// - `Keep` otherwise.
#[must_use]
pub fn resolve_transition(
    active: bool,
    requested: Option<CacheOverride>,
    force_update: bool,
    declared: CachePolicy,
    default_ttl: Duration,
) -> CacheTransition {
    let requested_ttl = requested.and_then(|o| o.ttl());

    match (active, requested_ttl) {
        (false, Some(ttl)) => CacheTransition::Attach(ttl),
        (true, ttl) if force_update => {
            CacheTransition::Refresh(ttl.or_else(|| declared.ttl()).unwrap_or(default_ttl))
        }
        _ => CacheTransition::Keep,
    }
}
