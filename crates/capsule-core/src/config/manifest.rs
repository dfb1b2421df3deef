use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::{debug, error};

use crate::{error::CapsuleError, route::RouteTable};

/// One service: a base URL and the routes registered under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Used in logs only. Route keys are not namespaced by service.
    pub name: String,
    pub base_url: String,
    #[serde(default)]
    pub routes: RouteTable,
}

/// Routes manifest.
///
/// Parsed with `toml` directly rather than through the layered loader so route keys keep their
/// case.
///
/// ```toml
/// [[services]]
/// name = "users"
/// base_url = "https://api.example.com"
///
/// [services.routes.get]
/// getUser = "/users/:id"
/// listUsers = { url = "/users", cache = 60 }
///
/// [services.routes.post]
/// createUser = "/users"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutesManifest {
    #[serde(default)]
    pub services: Vec<ServiceConfig>,
}

impl RoutesManifest {
    /// Reads and parses a manifest file.
    ///
    /// # Errors
    ///
    /// Returns [`CapsuleError::Configuration`] if the file cannot be read or is not a valid
    /// manifest.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CapsuleError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            error!(path = %path.display(), error = %e, "failed to read routes manifest");
            CapsuleError::Configuration(format!(
                "cannot read routes manifest {}: {e}",
                path.display()
            ))
        })?;

        let manifest = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), services = manifest.services.len(), "routes manifest loaded");
        Ok(manifest)
    }

    /// Parses a manifest from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`CapsuleError::Configuration`] on invalid TOML or unknown methods.
    pub fn from_toml_str(content: &str) -> Result<Self, CapsuleError> {
        toml::from_str(content).map_err(|e| {
            error!(error = %e, "invalid routes manifest");
            CapsuleError::from(e)
        })
    }

    /// Total number of route entries across all services.
    #[must_use]
    pub fn route_count(&self) -> usize {
        self.services.iter().flat_map(|s| s.routes.values()).map(|routes| routes.len()).sum()
    }
}
