//! Per-route response caching.
//!
//! Each route binding owns an optional [`ResponseCache`] slot. The slot starts empty: caching is
//! opt-in per call, and [`policy::resolve_transition`] decides whether a call attaches a cache,
//! refreshes the active one, or leaves it alone.
//!
//! ```text
//!   request(key, params, options)
//!          │
//!          ▼
//!   ┌──────────────────┐   Attach(ttl)   ┌──────────────────┐
//!   │ slot: empty      │ ──────────────► │ slot: cache #1   │
//!   └──────────────────┘                 └────────┬─────────┘
//!                                                 │ Refresh(ttl) (force_update)
//!                                                 ▼
//!                                        ┌──────────────────┐
//!                                        │ slot: cache #2   │
//!                                        └──────────────────┘
//! ```
//!
//! Only successful responses of read (`get`) routes are stored. A call passing
//! [`CacheOverride::Bypass`] skips the cache in both directions.

pub mod config;
pub mod policy;
pub mod response_cache;

pub use config::CacheConfig;
pub use policy::{resolve_transition, CacheOverride, CacheTransition};
pub use response_cache::{ResponseCache, MAX_TTL};
