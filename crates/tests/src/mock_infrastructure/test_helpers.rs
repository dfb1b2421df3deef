//! Test Helper Functions and Utilities
//!
//! Common helpers for building params, route tables, and capsules.

use capsule_core::{
    cache::CacheConfig,
    route::{CacheSetting, Method, Params, RouteOptions, RouteSpec, RouteTable},
    Capsule,
};
use serde_json::Value;

use super::RecordingTransport;

/// Base URL used for routes dispatched through a [`RecordingTransport`].
pub const TEST_BASE_URL: &str = "http://api.test";

/// Converts a JSON object literal into call params.
#[must_use]
pub fn params(value: Value) -> Params {
    value.as_object().cloned().unwrap_or_default()
}

/// Builds a route table from `(method, key, spec)` triples.
#[must_use]
pub fn route_table(entries: Vec<(Method, &str, RouteSpec)>) -> RouteTable {
    let mut table = RouteTable::new();
    for (method, key, spec) in entries {
        table.entry(method).or_default().insert(key.to_string(), spec);
    }
    table
}

/// A route entry declaring a cache policy of `seconds`.
#[must_use]
pub fn cached_route(url: &str, seconds: u64) -> RouteSpec {
    RouteSpec::from(RouteOptions {
        url: url.to_string(),
        cache: CacheSetting::Seconds(seconds),
        ..RouteOptions::default()
    })
}

/// The routes most tests dispatch against.
#[must_use]
pub fn user_routes() -> RouteTable {
    route_table(vec![
        (Method::Get, "getUser", RouteSpec::from("/users/:id")),
        (Method::Get, "listUsers", cached_route("/users", 60)),
        (Method::Get, "search", RouteSpec::from("/search")),
        (Method::Post, "createUser", RouteSpec::from("/users")),
        (Method::Delete, "deleteUser", RouteSpec::from("/users/:id")),
    ])
}

/// A capsule dispatching through `transport` with [`user_routes`] registered.
///
/// # Panics
///
/// Panics if registration fails.
#[must_use]
pub fn capsule_with(transport: &RecordingTransport) -> Capsule {
    let capsule = Capsule::with_cache_config(transport.shared(), CacheConfig::default());
    let report = capsule.register(TEST_BASE_URL, &user_routes()).expect("test routes register");
    assert!(report.is_clean(), "test routes should register cleanly: {report:?}");
    capsule
}
