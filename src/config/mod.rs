//! Configuration: TOML file with service endpoints and chat defaults.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{ChatConfig, Config, ServicesConfig};
