//! # Capsule Core
//!
//! Declarative route registry and dispatcher over an HTTP client.
//!
//! Routes are registered by name under a service base URL, then invoked by name with
//! parameters. This crate provides:
//!
//! - **[`route`]**: route definitions, the registry, and `:param` / `*param` URL templating.
//!
//! - **[`dispatch`]**: the [`Capsule`] facade. Resolves a route, applies per-call cache
//!   control, builds the request, and normalizes the outcome into [`Resolved`].
//!
//! - **[`cache`]**: per-route response caches and the attach/refresh transition rules.
//!
//! - **[`headers`]**: default headers shared by every dispatch.
//!
//! - **[`transport`]**: the [`Transport`] seam and its `reqwest` implementation.
//!
//! - **[`config`]**: layered application configuration and the routes manifest.
//!
//! ## Example
//!
//! ```no_run
//! use capsule_core::{route::Params, Capsule, RequestOptions, RoutesManifest};
//!
//! # async fn run() -> Result<(), capsule_core::CapsuleError> {
//! let capsule = Capsule::with_http_config(&Default::default())?;
//! let manifest = RoutesManifest::from_toml_str(
//!     r#"
//! [[services]]
//! name = "users"
//! base_url = "https://api.example.com"
//!
//! [services.routes.get]
//! getUser = "/users/:id"
//! "#,
//! )?;
//! capsule.register_manifest(&manifest);
//!
//! let mut params = Params::new();
//! params.insert("id".to_string(), 7.into());
//! let user = capsule.request("getUser", &params, RequestOptions::new().cache_for(60)).await?;
//! println!("{}", user.into_value());
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod headers;
pub mod route;
pub mod transport;

pub use config::{AppConfig, RoutesManifest};
pub use dispatch::{Capsule, FailurePayload, RequestOptions, Resolved};
pub use error::CapsuleError;
pub use headers::HeaderSource;
pub use transport::{HttpTransport, Transport};
