pub mod call;
pub mod config;
pub mod routes;
pub mod utils;

pub use call::{handle_call_command, CallArgs};
pub use config::{handle_config_command, ConfigCommands};
pub use routes::{handle_routes_command, RoutesArgs};
