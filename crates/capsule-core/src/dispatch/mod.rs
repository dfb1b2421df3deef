//! The [`Capsule`] facade: route registration, default headers, and dispatch.
//!
//! # Dispatch Flow
//!
//! ```text
//! request(key, params, options)
//!       │
//!       ▼
//! ┌──────────────┐
//! │ Route lookup │ ─── Unknown ──► Err(UnknownRoute)
//! └──────┬───────┘
//!        ▼
//! ┌──────────────────┐
//! │ Cache transition │  Keep | Attach(ttl) | Refresh(ttl)
//! └──────┬───────────┘
//!        ▼
//! ┌──────────────────┐
//! │ URL + headers    │  substitute, join base URL, merge default headers
//! └──────┬───────────┘
//!        ▼
//! ┌──────────────┐
//! │ Cache check  │ ─── Hit ──► Ok(Payload | Envelope)
//! └──────┬───────┘
//!        ▼
//! ┌──────────────┐
//! │  Transport   │ ─── Err ──► Ok(Failure { code, message })
//! └──────┬───────┘
//!        ▼
//!   store (get, 2xx) ──► Ok(Payload | Envelope)
//! ```

pub mod options;
pub mod resolved;

pub use options::RequestOptions;
pub use resolved::{FailurePayload, Resolved};

use serde_json::Value;
use std::{
    collections::BTreeMap,
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};
use tracing::{debug, error, info};

use crate::{
    cache::{resolve_transition, CacheConfig, CacheTransition, ResponseCache},
    config::{AppConfig, RoutesManifest},
    error::CapsuleError,
    headers::{DefaultHeaders, HeaderSource},
    route::{
        substitute, template::render_value, Method, Params, RegistrationReport, RouteBinding,
        RouteDefinition, RouteRegistry, RouteTable,
    },
    transport::{HttpClientConfig, HttpTransport, RequestPayload, Transport, TransportRequest},
};

/// Route registry plus dispatcher over a shared [`Transport`].
///
/// Each `Capsule` is independent: its routes, default headers, caches, and debug flag are not
/// shared with any other instance.
pub struct Capsule {
    registry: RouteRegistry,
    headers: DefaultHeaders,
    transport: Arc<dyn Transport>,
    cache_config: CacheConfig,
    debug: AtomicBool,
}

impl fmt::Debug for Capsule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capsule")
            .field("routes", &self.registry.len())
            .field("headers", &self.headers)
            .field("cache_config", &self.cache_config)
            .field("debug", &self.is_debug())
            .finish_non_exhaustive()
    }
}

impl Capsule {
    /// Creates an empty registry dispatching through `transport` with default cache settings.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_cache_config(transport, CacheConfig::default())
    }

    #[must_use]
    pub fn with_cache_config(transport: Arc<dyn Transport>, cache_config: CacheConfig) -> Self {
        Self {
            registry: RouteRegistry::new(cache_config.default_ttl()),
            headers: DefaultHeaders::new(),
            transport,
            cache_config,
            debug: AtomicBool::new(false),
        }
    }

    /// Creates a registry backed by a new [`HttpTransport`].
    ///
    /// # Errors
    ///
    /// Returns [`CapsuleError::Transport`] if the HTTP client cannot be built.
    pub fn with_http_config(http: &HttpClientConfig) -> Result<Self, CapsuleError> {
        let transport = HttpTransport::with_config(http)?;
        Ok(Self::new(Arc::new(transport)))
    }

    /// Creates a registry from application configuration. Routes are not loaded.
    ///
    /// # Errors
    ///
    /// Returns [`CapsuleError::Transport`] if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, CapsuleError> {
        let transport = HttpTransport::with_config(&config.http)?;
        let capsule = Self::with_cache_config(Arc::new(transport), config.cache.clone());
        if config.debug {
            capsule.enable_debug();
        }
        Ok(capsule)
    }

    /// Registers a route table under `base_url`. See [`RouteRegistry::register`].
    ///
    /// # Errors
    ///
    /// Returns [`CapsuleError::Configuration`] if `base_url` is invalid.
    pub fn register(
        &self,
        base_url: &str,
        table: &RouteTable,
    ) -> Result<RegistrationReport, CapsuleError> {
        self.registry.register(base_url, table)
    }

    /// Registers every service of a manifest.
    ///
    /// A service with an invalid base URL is skipped and its error added to the report.
    pub fn register_manifest(&self, manifest: &RoutesManifest) -> RegistrationReport {
        let mut report = RegistrationReport::default();

        for service in &manifest.services {
            match self.register(&service.base_url, &service.routes) {
                Ok(service_report) => {
                    debug!(
                        service = %service.name,
                        registered = service_report.registered.len(),
                        "service registered"
                    );
                    report.merge(service_report);
                }
                Err(e) => {
                    error!(service = %service.name, error = %e, "service skipped");
                    report.rejected.push(e);
                }
            }
        }

        report
    }

    /// Adds default headers for every later dispatch. Returns the merged set.
    pub fn add_header<K, I>(&self, headers: I) -> BTreeMap<String, String>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, HeaderSource)>,
    {
        self.headers.add(headers)
    }

    #[must_use]
    pub fn default_headers(&self) -> BTreeMap<String, String> {
        self.headers.snapshot()
    }

    /// Turns on per-request logging. There is no way to turn it off again.
    pub fn enable_debug(&self) {
        if !self.debug.swap(true, Ordering::Relaxed) {
            info!("debug mode enabled");
        }
    }

    #[must_use]
    pub fn is_debug(&self) -> bool {
        self.debug.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn routes(&self) -> Vec<RouteDefinition> {
        self.registry.definitions()
    }

    #[must_use]
    pub fn route(&self, key: &str) -> Option<RouteDefinition> {
        self.registry.get(key).map(|binding| binding.definition().clone())
    }

    /// The cache currently attached to `key`, if any.
    #[must_use]
    pub fn active_cache(&self, key: &str) -> Option<Arc<ResponseCache>> {
        self.registry.get(key).and_then(|binding| binding.active_cache())
    }

    /// Dispatches the route registered as `key`.
    ///
    /// Transport failures never surface as `Err`; they resolve to [`Resolved::Failure`].
    ///
    /// # Errors
    ///
    /// Returns [`CapsuleError::UnknownRoute`] if no route is registered under `key`. No request
    /// is sent in that case.
    pub async fn request(
        &self,
        key: &str,
        params: &Params,
        options: RequestOptions,
    ) -> Result<Resolved, CapsuleError> {
        let Some(binding) = self.registry.get(key) else {
            let err = CapsuleError::UnknownRoute(key.to_string());
            error!(route = %key, "{err}");
            return Err(err);
        };

        let active = self.prepare_cache(&binding, &options);
        let definition = binding.definition();
        let method = definition.method;

        let url = definition.full_url(&substitute(&definition.url_template, params));

        let bypass = options.bypasses_cache();
        let RequestOptions { headers: extra_headers, full_result, .. } = options;
        let mut headers = definition.headers.clone();
        headers.extend(self.headers.add(extra_headers));

        let payload = build_payload(method, params);

        let cache = active.filter(|_| method.is_read() && !bypass);
        let cache_key = ResponseCache::key_for(&url, payload.query());

        if let Some(cache) = &cache {
            if let Some(hit) = cache.get(&cache_key).await {
                if self.is_debug() {
                    info!("[{method}] {key} -> {url} (cached)");
                }
                debug!(route = %key, generation = cache.generation(), "cache hit");
                return Ok(Resolved::success(&hit, full_result));
            }
        }

        if self.is_debug() {
            info!("[{method}] {key} -> {url}");
        }

        let request =
            TransportRequest { method, url: url.clone(), headers, payload, timeout: definition.timeout };

        match self.transport.send(request).await {
            Ok(response) => {
                debug!(route = %key, status = response.status, "request completed");
                let response = Arc::new(response);
                if let Some(cache) = &cache {
                    cache.insert(cache_key, Arc::clone(&response)).await;
                }
                Ok(Resolved::success(&response, full_result))
            }
            Err(e) => {
                let failure = FailurePayload::from(&e);
                if self.is_debug() {
                    error!("[{method}] {} {key} -> {url}", failure.code);
                }
                debug!(route = %key, error = %e, "request failed");
                Ok(Resolved::Failure(failure))
            }
        }
    }

    /// Applies the cache transition for one call and returns the cache in effect afterwards.
    fn prepare_cache(
        &self,
        binding: &RouteBinding,
        options: &RequestOptions,
    ) -> Option<Arc<ResponseCache>> {
        let active = binding.active_cache();
        let transition = resolve_transition(
            active.is_some(),
            options.cache,
            options.force_update,
            binding.definition().cache_policy,
            self.cache_config.default_ttl(),
        );

        match transition {
            CacheTransition::Keep => active,
            CacheTransition::Attach(ttl) | CacheTransition::Refresh(ttl) => {
                let cache = Arc::new(ResponseCache::new(ttl, self.cache_config.max_entries));
                let previous = binding.install_cache(Arc::clone(&cache));
                info!(
                    route = %binding.definition().key,
                    ttl_secs = ttl.as_secs(),
                    generation = cache.generation(),
                    replaced = ?previous.map(|c| c.generation()),
                    "route cache installed"
                );
                Some(cache)
            }
        }
    }
}

/// Read methods carry params as query pairs, everything else as a JSON body.
fn build_payload(method: Method, params: &Params) -> RequestPayload {
    if method.is_read() {
        RequestPayload::Query(query_pairs(params))
    } else {
        RequestPayload::Json(Value::Object(params.clone()))
    }
}

/// Null values are dropped and array values repeat as `name[]`.
fn query_pairs(params: &Params) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(params.len());
    for (name, value) in params {
        match value {
            Value::Null => {}
            Value::Array(items) => pairs.extend(
                items
                    .iter()
                    .filter(|item| !item.is_null())
                    .map(|item| (format!("{name}[]"), render_value(item))),
            ),
            other => pairs.push((name.clone(), render_value(other))),
        }
    }
    pairs
}
