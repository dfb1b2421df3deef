//! Default headers shared by every route of a [`Capsule`](crate::Capsule).
//!
//! Values are either literals or providers. A provider is a zero-argument closure invoked
//! exactly once, when the header is added; the returned string is what every later request
//! sends. Providers are not re-run per request.

use parking_lot::RwLock;
use std::{collections::BTreeMap, fmt};
use tracing::debug;

/// Header every registry starts with.
pub const BASELINE_HEADER: (&str, &str) = ("Cache-Control", "no-cache");

/// A header value as supplied by a caller.
pub enum HeaderSource {
    Literal(String),
    Provider(Box<dyn FnOnce() -> String + Send>),
}

impl HeaderSource {
    /// Wraps a closure evaluated once, at the time the header is added.
    pub fn provider(f: impl FnOnce() -> String + Send + 'static) -> Self {
        Self::Provider(Box::new(f))
    }

    fn resolve(self) -> String {
        match self {
            Self::Literal(value) => value,
            Self::Provider(f) => f(),
        }
    }
}

impl fmt::Debug for HeaderSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Provider(_) => f.write_str("Provider(..)"),
        }
    }
}

impl From<&str> for HeaderSource {
    fn from(value: &str) -> Self {
        Self::Literal(value.to_string())
    }
}

impl From<String> for HeaderSource {
    fn from(value: String) -> Self {
        Self::Literal(value)
    }
}

/// The shared, mutable default header set.
#[derive(Debug)]
pub struct DefaultHeaders {
    values: RwLock<BTreeMap<String, String>>,
}

impl Default for DefaultHeaders {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultHeaders {
    /// Creates the set seeded with [`BASELINE_HEADER`].
    #[must_use]
    pub fn new() -> Self {
        let mut values = BTreeMap::new();
        values.insert(BASELINE_HEADER.0.to_string(), BASELINE_HEADER.1.to_string());
        Self { values: RwLock::new(values) }
    }

    /// Resolves providers and merges the result, later keys overriding earlier ones.
    ///
    /// Returns the merged set as it stands after this call.
    pub fn add<K, I>(&self, headers: I) -> BTreeMap<String, String>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, HeaderSource)>,
    {
        // Providers run outside the lock.
        let resolved: Vec<(String, String)> =
            headers.into_iter().map(|(name, source)| (name.into(), source.resolve())).collect();

        let mut values = self.values.write();
        for (name, value) in resolved {
            debug!(header = %name, "default header set");
            values.insert(name, value);
        }
        values.clone()
    }

    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.values.read().clone()
    }
}
