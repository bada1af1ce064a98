//! Configuration type definitions

use heapless::String;

use crate::auto::AutoMode;
use crate::traits::{ClosedLoopGains, FeedbackDevice, SmartMotionConfig};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum trajectory base name length
pub const MAX_PATH_NAME_LEN: usize = 32;

/// Default control loop period
pub const DEFAULT_TICK_PERIOD_MS: u16 = 20;

/// Motion profile follower configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FollowerConfig {
    /// Bottom buffer depth both sides must reach before execution starts
    pub min_points: u16,
    /// Duration of every trajectory point (ms)
    pub point_duration_ms: u16,
    /// Gains loaded into slot 0 of both sides
    pub gains: ClosedLoopGains,
    /// Closed-loop feedback sensor
    pub feedback: FeedbackDevice,
    /// Update period for the profiling status frames (ms)
    pub status_period_ms: u16,
}

impl Default for FollowerConfig {
    fn default() -> Self {
        Self {
            min_points: 5,
            point_duration_ms: 10,
            gains: ClosedLoopGains::new(0.5, 0.0, 0.0, 0.0),
            feedback: FeedbackDevice::MagEncoderRelative,
            status_period_ms: 10,
        }
    }
}

/// Elevator configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ElevatorConfig {
    /// Height of the stationary stage
    pub stage_threshold: f64,
    /// Highest allowed set point
    pub max_position: f64,
    /// Position tolerance for "at set point"
    pub deadband: f64,
    /// Drop applied to release a hatch panel
    pub hatch_drop_offset: f64,
    /// Drop applied to seat a hatch panel
    pub hatch_place_offset: f64,
    /// Motor smart motion configuration
    pub motion: SmartMotionConfig,
}

impl Default for ElevatorConfig {
    fn default() -> Self {
        Self {
            stage_threshold: 30.0,
            max_position: 47.5,
            deadband: 0.5,
            hatch_drop_offset: 3.2,
            hatch_place_offset: 0.7,
            motion: SmartMotionConfig::default(),
        }
    }
}

/// Timed open-loop drive parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DriveTimeConfig {
    /// Output on both sides (-1.0 to 1.0)
    pub speed: f64,
    /// Drive duration (s)
    pub duration_s: f64,
}

impl Default for DriveTimeConfig {
    fn default() -> Self {
        Self {
            speed: 0.5,
            duration_s: 2.0,
        }
    }
}

/// Complete robot configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RobotConfig {
    /// Config version
    pub version: u8,
    /// Control loop period (ms)
    pub tick_period_ms: u16,
    /// Length of the autonomous period (ms)
    pub autonomous_ms: u32,
    /// Routine to run
    pub autonomous: AutoMode,
    /// Trajectory base name for the follow-path routine
    pub path: String<MAX_PATH_NAME_LEN>,
    /// Cross-line drive
    pub cross_line: DriveTimeConfig,
    /// Drive leg of the hatch routine
    pub hatch_approach: DriveTimeConfig,
    /// Motion profile follower
    pub follower: FollowerConfig,
    /// Elevator
    pub elevator: ElevatorConfig,
}

impl Default for RobotConfig {
    fn default() -> Self {
        let mut path = String::new();
        let _ = path.push_str("cross_line");
        Self {
            version: 1,
            tick_period_ms: DEFAULT_TICK_PERIOD_MS,
            autonomous_ms: 15_000,
            autonomous: AutoMode::CrossLine,
            path,
            cross_line: DriveTimeConfig::default(),
            hatch_approach: DriveTimeConfig {
                speed: 0.4,
                duration_s: 1.5,
            },
            follower: FollowerConfig::default(),
            elevator: ElevatorConfig::default(),
        }
    }
}
