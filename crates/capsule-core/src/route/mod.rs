//! Route definitions, the route registry, and URL templating.

pub mod definition;
pub mod registry;
pub mod template;

pub use definition::{
    CachePolicy, CacheSetting, Method, RouteDefinition, RouteOptions, RouteSpec, RouteTable,
};
pub use registry::{RegistrationReport, RouteBinding, RouteRegistry};
pub use template::{placeholders, substitute, Params, MISSING_PARAM};
