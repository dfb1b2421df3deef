use thiserror::Error;

use crate::transport::TransportError;

/// Errors surfaced by registration, configuration loading, and dispatch.
///
/// Every variant is logged where it is produced. Transport failures normally never reach
/// callers as errors: the dispatcher turns them into
/// [`Resolved::Failure`](crate::dispatch::Resolved::Failure).
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CapsuleError {
    /// Invalid base URL, unreadable manifest, or bad settings.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A route key was registered twice. The first binding is kept.
    #[error("The route {0} already registered")]
    DuplicateRoute(String),

    /// Dispatch to a key that was never registered.
    #[error("The route {0} was not defined")]
    UnknownRoute(String),

    /// Transport construction failed.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

impl From<config::ConfigError> for CapsuleError {
    fn from(error: config::ConfigError) -> Self {
        Self::Configuration(error.to_string())
    }
}

impl From<toml::de::Error> for CapsuleError {
    fn from(error: toml::de::Error) -> Self {
        Self::Configuration(error.to_string())
    }
}
