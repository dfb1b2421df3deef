use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr, time::Duration};

/// HTTP verbs a route can be registered under.
///
/// Manifests use the lowercase names (`get`, `post`, ...). Only [`Method::Get`] is treated as a
/// read: its parameters travel as a query string and its responses are eligible for caching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl Method {
    /// Lowercase name as used in route tables.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Patch => "patch",
            Self::Delete => "delete",
            Self::Head => "head",
            Self::Options => "options",
        }
    }

    #[must_use]
    pub fn is_read(&self) -> bool {
        matches!(self, Self::Get)
    }

    #[must_use]
    pub fn to_http(&self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
            Self::Head => reqwest::Method::HEAD,
            Self::Options => reqwest::Method::OPTIONS,
        }
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(Self::Get),
            "post" => Ok(Self::Post),
            "put" => Ok(Self::Put),
            "patch" => Ok(Self::Patch),
            "delete" => Ok(Self::Delete),
            "head" => Ok(Self::Head),
            "options" => Ok(Self::Options),
            other => Err(format!("unsupported method: {other}")),
        }
    }
}

impl TryFrom<String> for Method {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.as_str().to_ascii_uppercase())
    }
}

/// `cache` value of a route entry: a number of seconds or a flag.
///
/// `0` and `false` both mean "no caching"; `true` picks the configured default TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CacheSetting {
    Seconds(u64),
    Flag(bool),
}

impl Default for CacheSetting {
    fn default() -> Self {
        Self::Flag(false)
    }
}

/// Cache policy declared for a route at registration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CachePolicy {
    #[default]
    Disabled,
    Enabled {
        #[serde(with = "duration_secs")]
        ttl: Duration,
    },
}

impl CachePolicy {
    #[must_use]
    pub fn from_setting(setting: CacheSetting, default_ttl: Duration) -> Self {
        match setting {
            CacheSetting::Seconds(0) | CacheSetting::Flag(false) => Self::Disabled,
            CacheSetting::Seconds(secs) => Self::Enabled { ttl: Duration::from_secs(secs) },
            CacheSetting::Flag(true) => Self::Enabled { ttl: default_ttl },
        }
    }

    #[must_use]
    pub fn ttl(&self) -> Option<Duration> {
        match self {
            Self::Disabled => None,
            Self::Enabled { ttl } => Some(*ttl),
        }
    }
}

mod duration_secs {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }
}

/// Full options form of a route entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteOptions {
    /// Path template relative to the service base URL, e.g. `/users/:id`.
    pub url: String,

    #[serde(default)]
    pub cache: CacheSetting,

    /// Per-route request timeout in milliseconds. Falls back to the client timeout.
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Headers sent with every call of this route, underneath the default headers.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

/// A route entry as written in a route table: either a bare template or full options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RouteSpec {
    Template(String),
    Options(RouteOptions),
}

impl RouteSpec {
    #[must_use]
    pub fn into_options(self) -> RouteOptions {
        match self {
            Self::Template(url) => RouteOptions { url, ..RouteOptions::default() },
            Self::Options(options) => options,
        }
    }
}

impl From<&str> for RouteSpec {
    fn from(url: &str) -> Self {
        Self::Template(url.to_string())
    }
}

impl From<RouteOptions> for RouteSpec {
    fn from(options: RouteOptions) -> Self {
        Self::Options(options)
    }
}

/// Method -> route key -> entry, both levels in the order they were written.
pub type RouteTable = IndexMap<Method, IndexMap<String, RouteSpec>>;

/// A registered route. Immutable once stored in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteDefinition {
    pub key: String,
    pub method: Method,
    pub base_url: String,
    pub url_template: String,
    pub cache_policy: CachePolicy,
    #[serde(skip)]
    pub timeout: Option<Duration>,
    pub headers: BTreeMap<String, String>,
}

impl RouteDefinition {
    /// Joins the base URL with an already substituted path.
    ///
    /// Absolute `http(s)://` paths are used as-is. Otherwise exactly one `/` separates the two
    /// parts.
    #[must_use]
    pub fn full_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if path.is_empty() {
            return self.base_url.clone();
        }
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}
