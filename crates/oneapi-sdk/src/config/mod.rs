//! Static client configuration.
//!
//! Reads the TOML config file holding the API key and networking flags.
//! Runtime options on the client builder take precedence over these values.

#[allow(clippy::module_inception)]
mod config;
mod paths;

pub(crate) use config::non_blank;
pub use config::{Config, NetworkingConfig};
pub use paths::resolve_config_path;
