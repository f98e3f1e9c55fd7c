//! Configuration loading.
//!
//! This module loads `.ci-setup/config.toml` into a
//! [`GlobalConfig`](csk_protocol::GlobalConfig).

pub mod error;
pub mod loader;

pub use error::{ConfigError, ConfigResult};
pub use loader::{config_path, load_config};
