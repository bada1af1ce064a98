//! Configuration loading
//!
//! Reads the TOML file named by [`CONFIG_ENV`]. Falls back to the embedded
//! defaults if the variable is unset or the file is missing or invalid.

use std::{env, fs};

use log::{debug, info, warn};
use rocketscript_core::config::RobotConfig;

use super::toml::parse_config;

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "ROCKETSCRIPT_CONFIG";

/// Configuration loading errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file could not be read
    Io,
    /// TOML parsing failed
    TomlParse,
    /// Config version mismatch
    VersionMismatch,
    /// A value the control loop cannot run with
    Invalid(&'static str),
}

/// Load configuration, never failing
pub fn load_config(embedded: &str) -> RobotConfig {
    match env::var(CONFIG_ENV) {
        Ok(path) => match load_file(&path) {
            Ok(config) => {
                info!("Loaded configuration from {}", path);
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {:?}, using embedded defaults", path, e);
            }
        },
        Err(_) => {
            debug!("{} not set, using embedded defaults", CONFIG_ENV);
        }
    }

    match parse_config(embedded) {
        Ok(config) => config,
        Err(e) => {
            // robot.toml is validated at build time, so this needs a bad edit
            warn!("Embedded configuration invalid: {:?}, using built-in defaults", e);
            RobotConfig::default()
        }
    }
}

/// Load and parse one config file
pub fn load_file(path: &str) -> Result<RobotConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| {
        debug!("Read of {} failed: {}", path, e);
        ConfigError::Io
    })?;
    parse_config(&text)
}

/// Print the loaded configuration summary
pub fn log_config_summary(config: &RobotConfig) {
    info!("Config summary:");
    info!(
        "  Tick: {} ms, autonomous period: {} ms",
        config.tick_period_ms, config.autonomous_ms
    );
    info!("  Routine: {}", config.autonomous.as_str());
    info!("  Path: {}", config.path.as_str());
    info!(
        "  Follower: min {} points, {} ms per point, kP {}",
        config.follower.min_points, config.follower.point_duration_ms, config.follower.gains.kp
    );
    info!(
        "  Elevator: max {}, deadband {}",
        config.elevator.max_position, config.elevator.deadband
    );
}
