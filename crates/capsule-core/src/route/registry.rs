//! Route registry: validated route definitions keyed by a registry-wide unique name.

use arc_swap::ArcSwapOption;
use dashmap::{mapref::entry::Entry, DashMap};
use std::{sync::Arc, time::Duration};
use tracing::{debug, error, info};
use url::Url;

use super::definition::{CachePolicy, RouteDefinition, RouteTable};
use crate::{cache::ResponseCache, error::CapsuleError};

/// A registered route together with its cache slot.
///
/// The definition never changes after registration. The cache slot is swapped atomically by
/// the dispatcher, so concurrent calls see either the previous cache or the new one.
#[derive(Debug)]
pub struct RouteBinding {
    definition: RouteDefinition,
    cache: ArcSwapOption<ResponseCache>,
}

impl RouteBinding {
    /// Creates a binding with an empty cache slot.
    #[must_use]
    pub fn new(definition: RouteDefinition) -> Self {
        Self { definition, cache: ArcSwapOption::empty() }
    }

    #[must_use]
    pub fn definition(&self) -> &RouteDefinition {
        &self.definition
    }

    #[must_use]
    pub fn active_cache(&self) -> Option<Arc<ResponseCache>> {
        self.cache.load_full()
    }

    /// Installs `cache`, returning the one it replaced.
    pub fn install_cache(&self, cache: Arc<ResponseCache>) -> Option<Arc<ResponseCache>> {
        self.cache.swap(Some(cache))
    }
}

/// Outcome of one registration call.
///
/// Rejected entries are logged as they happen; the report lets callers react without reading
/// logs.
#[derive(Debug, Default)]
pub struct RegistrationReport {
    pub registered: Vec<String>,
    pub rejected: Vec<CapsuleError>,
}

impl RegistrationReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }

    pub fn merge(&mut self, other: Self) {
        self.registered.extend(other.registered);
        self.rejected.extend(other.rejected);
    }
}

/// Registry of named routes.
///
/// Keys are unique across the whole registry, not per service. There is no removal: a binding
/// lives as long as the registry.
#[derive(Debug)]
pub struct RouteRegistry {
    routes: DashMap<String, Arc<RouteBinding>>,
    default_ttl: Duration,
}

impl RouteRegistry {
    /// Creates an empty registry. `default_ttl` backs routes declared with `cache = true`.
    #[must_use]
    pub fn new(default_ttl: Duration) -> Self {
        Self { routes: DashMap::new(), default_ttl }
    }

    /// Registers every entry of `table` under `base_url`.
    ///
    /// A duplicate key rejects that entry only; the rest of the table is still registered.
    ///
    /// # Errors
    ///
    /// Returns [`CapsuleError::Configuration`] if `base_url` is not an absolute `http(s)` URL.
    /// Nothing is registered in that case.
    pub fn register(
        &self,
        base_url: &str,
        table: &RouteTable,
    ) -> Result<RegistrationReport, CapsuleError> {
        let base_url = validate_base_url(base_url).inspect_err(|e| {
            error!(base_url = base_url, error = %e, "route registration rejected");
        })?;

        let mut report = RegistrationReport::default();

        for (method, routes) in table {
            for (key, spec) in routes {
                let options = spec.clone().into_options();
                let definition = RouteDefinition {
                    key: key.clone(),
                    method: *method,
                    base_url: base_url.clone(),
                    url_template: options.url,
                    cache_policy: CachePolicy::from_setting(options.cache, self.default_ttl),
                    timeout: options.timeout_ms.map(Duration::from_millis),
                    headers: options.headers,
                };

                match self.routes.entry(key.clone()) {
                    Entry::Occupied(_) => {
                        error!(route = %key, method = %method, "route already registered");
                        report.rejected.push(CapsuleError::DuplicateRoute(key.clone()));
                    }
                    Entry::Vacant(slot) => {
                        debug!(
                            route = %key,
                            method = %method,
                            template = %definition.url_template,
                            cache = ?definition.cache_policy,
                            "route registered"
                        );
                        slot.insert(Arc::new(RouteBinding::new(definition)));
                        report.registered.push(key.clone());
                    }
                }
            }
        }

        info!(
            base_url = %base_url,
            registered = report.registered.len(),
            rejected = report.rejected.len(),
            "routes registered"
        );

        Ok(report)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<Arc<RouteBinding>> {
        self.routes.get(key).map(|entry| Arc::clone(entry.value()))
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.routes.contains_key(key)
    }

    /// All definitions, sorted by key.
    #[must_use]
    pub fn definitions(&self) -> Vec<RouteDefinition> {
        let mut definitions: Vec<RouteDefinition> =
            self.routes.iter().map(|entry| entry.value().definition().clone()).collect();
        definitions.sort_by(|a, b| a.key.cmp(&b.key));
        definitions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

fn validate_base_url(base_url: &str) -> Result<String, CapsuleError> {
    if base_url.trim().is_empty() {
        return Err(CapsuleError::Configuration("base URL must not be empty".to_string()));
    }

    let parsed = Url::parse(base_url)
        .map_err(|e| CapsuleError::Configuration(format!("invalid base URL {base_url}: {e}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(CapsuleError::Configuration(format!(
            "base URL must use http or https: {base_url}"
        )));
    }

    Ok(base_url.to_string())
}
