//! Configuration loading and parsing
//!
//! Loads the robot configuration from the file named by
//! `ROCKETSCRIPT_CONFIG`, falling back to the embedded defaults.

pub mod loader;
pub mod toml;

pub use loader::{load_config, log_config_summary, ConfigError};
