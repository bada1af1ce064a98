//! TOML robot configuration parsing
//!
//! Deserializes into [`RobotConfig`] with serde, then checks the values the
//! control loop cannot run with.

use rocketscript_core::auto::AutoMode;
use rocketscript_core::config::RobotConfig;

use super::ConfigError;

/// Supported config version
pub const CONFIG_VERSION: u8 = 1;

/// Refill period is tick / 3, so anything shorter cannot be scheduled
const MIN_TICK_PERIOD_MS: u16 = 3;

/// Parse and validate a TOML robot configuration
pub fn parse_config(input: &str) -> Result<RobotConfig, ConfigError> {
    let config: RobotConfig = ::toml::from_str(input).map_err(|e| {
        log::warn!("TOML parse error: {}", e.message());
        ConfigError::TomlParse
    })?;

    validate(&config)?;
    Ok(config)
}

fn validate(config: &RobotConfig) -> Result<(), ConfigError> {
    if config.version != CONFIG_VERSION {
        return Err(ConfigError::VersionMismatch);
    }
    if config.tick_period_ms < MIN_TICK_PERIOD_MS {
        return Err(ConfigError::Invalid("tick_period_ms too short"));
    }
    if config.follower.min_points == 0 {
        return Err(ConfigError::Invalid("follower.min_points must be positive"));
    }
    if config.follower.point_duration_ms == 0 {
        return Err(ConfigError::Invalid("follower.point_duration_ms must be positive"));
    }
    if config.elevator.max_position <= 0.0 {
        return Err(ConfigError::Invalid("elevator.max_position must be positive"));
    }
    if config.autonomous == AutoMode::FollowPath && config.path.is_empty() {
        return Err(ConfigError::Invalid("follow_path requires a path"));
    }
    Ok(())
}
