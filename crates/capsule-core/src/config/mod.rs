//! Application configuration with layered loading.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in this order (later overrides earlier):
//!
//! 1. **Compiled defaults**: `Default` implementations
//! 2. **Config file**: TOML file named by the `CAPSULE_CONFIG` env var
//! 3. **Environment variables**: `CAPSULE__*` env vars override specific fields
//!
//! # Configuration Sections
//!
//! - [`HttpClientConfig`]: connect/request timeouts, connection pool, user agent
//! - [`CacheConfig`]: per-route cache capacity and default TTL
//! - [`LoggingConfig`]: log level, format, and ANSI colors
//!
//! Routes live in a separate manifest, see [`RoutesManifest`].
//!
//! # Example
//!
//! ```toml
//! debug = true
//! routes_path = "config/routes.toml"
//!
//! [http]
//! request_timeout_ms = 10000
//!
//! [cache]
//! max_entries = 500
//! default_ttl_seconds = 120
//!
//! [logging]
//! level = "debug"
//! format = "json"
//! ansi = false
//! ```

mod manifest;

pub use manifest::{RoutesManifest, ServiceConfig};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{cache::CacheConfig, error::CapsuleError, transport::HttpClientConfig};

/// Logging output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (e.g., "trace", "debug", "info", "warn", "error"). Defaults to `"info"`.
    pub level: String,

    /// Output format: `"json"` or `"pretty"`. Defaults to `"pretty"`.
    pub format: String,

    /// Colored output. Turn off for plain log files and non-terminal sinks.
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "pretty".to_string(), ansi: true }
    }
}

/// Root application configuration.
///
/// Environment overrides use the `CAPSULE_` prefix with `__` as separator, e.g.
/// `CAPSULE__CACHE__MAX_ENTRIES=500`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Log every dispatch as `[METHOD] key -> url`. Defaults to `false`.
    #[serde(default)]
    pub debug: bool,

    /// Path of the routes manifest. Defaults to `config/routes.toml`.
    #[serde(default = "default_routes_path")]
    pub routes_path: String,

    #[serde(default)]
    pub http: HttpClientConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_routes_path() -> String {
    "config/routes.toml".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            debug: false,
            routes_path: default_routes_path(),
            http: HttpClientConfig::default(),
            cache: CacheConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from `config_path` (optional) layered with environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`CapsuleError::Configuration`] if a source cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(config_path: P) -> Result<Self, CapsuleError> {
        let config_builder = Config::builder()
            .add_source(File::with_name(&config_path.as_ref().to_string_lossy()).required(false))
            .add_source(Environment::with_prefix("CAPSULE").separator("__").try_parsing(true))
            .build()?;

        Ok(config_builder.try_deserialize()?)
    }

    /// Loads configuration from `config/capsule.toml` with fallback to defaults.
    ///
    /// The path can be overridden with the `CAPSULE_CONFIG` environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`CapsuleError::Configuration`] if the configuration cannot be loaded or parsed.
    pub fn load() -> Result<Self, CapsuleError> {
        let config_path =
            std::env::var("CAPSULE_CONFIG").unwrap_or_else(|_| "config/capsule.toml".to_string());
        Self::from_file(&config_path)
    }

    /// Validates configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`CapsuleError::Configuration`] describing the first invalid field.
    pub fn validate(&self) -> Result<(), CapsuleError> {
        let invalid = |msg: &str| Err(CapsuleError::Configuration(msg.to_string()));

        if self.cache.max_entries == 0 {
            return invalid("Cache max entries must be greater than 0");
        }

        if self.cache.default_ttl_seconds == 0 {
            return invalid("Cache default TTL must be greater than 0");
        }

        if self.http.request_timeout_ms == 0 {
            return invalid("HTTP request timeout must be greater than 0");
        }

        if self.http.connect_timeout_ms == 0 {
            return invalid("HTTP connect timeout must be greater than 0");
        }

        if !["json", "pretty"].contains(&self.logging.format.as_str()) {
            return invalid("Logging format must be 'json' or 'pretty'");
        }

        if self.routes_path.trim().is_empty() {
            return invalid("Routes path must not be empty");
        }

        Ok(())
    }
}
