//! Motor controller traits
//!
//! This module defines traits for the drivetrain motor controllers:
//! - Plain percent-output control (every controller)
//! - Motion profile streaming (controllers with an on-board trajectory buffer)
//!
//! Motion profile controllers keep two buffers. Points pushed by the robot
//! code land in the top-level buffer; advancing the buffer window funnels
//! them into the controller's bottom buffer, from which the closed loop
//! consumes one point per trajectory period.

use crate::trajectory::TrajectoryPoint;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors that can occur with motion profile operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProfileError {
    /// Top-level trajectory buffer is full
    BufferFull,
    /// Controller did not acknowledge the request
    NotResponding,
}

/// Output mode of a motor controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlMode {
    /// Open-loop percent output
    #[default]
    PercentOutput,
    /// Closed-loop motion profile execution
    MotionProfile(ProfileMode),
}

/// Motion profile execution mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProfileMode {
    /// Output is neutral, buffered points are not consumed
    #[default]
    Disable,
    /// Buffered points are consumed and tracked in closed loop
    Enable,
    /// Hold the last commanded velocity, points are not consumed
    Hold,
}

/// Feedback sensor used by the closed loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FeedbackDevice {
    /// Magnetic encoder, relative mode
    #[default]
    MagEncoderRelative,
    /// Magnetic encoder, absolute (pulse width) mode
    MagEncoderAbsolute,
    /// Quadrature encoder on the data port
    Quadrature,
}

/// Status frames whose update period is tuned for profiling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusFrame {
    /// Motion profile buffer counters
    MotionProfileBuffer,
    /// Closed-loop targets
    Targets,
    /// Primary feedback sensor
    Feedback,
    /// Auxiliary targets
    Targets1,
}

impl StatusFrame {
    /// Every frame a profile follower keeps fresh
    pub const PROFILING: [StatusFrame; 4] = [
        StatusFrame::MotionProfileBuffer,
        StatusFrame::Targets,
        StatusFrame::Feedback,
        StatusFrame::Targets1,
    ];
}

/// Closed-loop gain constants for one parameter slot
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClosedLoopGains {
    /// Proportional gain
    pub kp: f64,
    /// Integral gain
    pub ki: f64,
    /// Derivative gain
    pub kd: f64,
    /// Feed-forward gain
    pub kf: f64,
}

impl ClosedLoopGains {
    /// Create a gain set
    pub const fn new(kp: f64, ki: f64, kd: f64, kf: f64) -> Self {
        Self { kp, ki, kd, kf }
    }
}

/// Snapshot of a controller's motion profile buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProfileStatus {
    /// Points not yet transferred into the controller
    pub top_buffer_count: u32,
    /// Points available in the controller for immediate execution
    pub bottom_buffer_count: u32,
    /// Controller ran out of points while executing
    pub has_underrun: bool,
    /// The point being executed is the last one of the profile
    pub active_point_is_last: bool,
    /// Current execution mode
    pub mode: ProfileMode,
}

/// Base trait for every drivetrain motor controller
pub trait MotorController {
    /// Drive at an open-loop output (-1.0 to 1.0)
    fn set_percent_output(&self, output: f64);

    /// Get the current control mode
    fn control_mode(&self) -> ControlMode;

    /// Command neutral output
    fn neutral(&self) {
        self.set_percent_output(0.0);
    }
}

/// Trait for controllers that can stream and execute a motion profile
///
/// Reads that fail on the bus report zero counts rather than an error; the
/// profile logic only ever sees values.
pub trait MotionProfileController: MotorController {
    /// Push one point into the top-level buffer
    fn push_trajectory_point(&self, point: &TrajectoryPoint) -> Result<(), ProfileError>;

    /// Funnel points from the top-level buffer into the bottom buffer
    ///
    /// Called periodically from the refill driver, faster than the
    /// controller consumes points.
    fn advance_buffer_window(&self);

    /// Read both buffer counters and flags
    fn profile_status(&self) -> ProfileStatus;

    /// Points available for immediate execution
    fn bottom_buffer_count(&self) -> u32 {
        self.profile_status().bottom_buffer_count
    }

    /// Points not yet transferred into the controller
    fn top_level_buffer_count(&self) -> u32 {
        self.profile_status().top_buffer_count
    }

    /// Switch the motion profile execution mode
    fn set_profile_mode(&self, mode: ProfileMode);

    /// Enable closed-loop profile execution, or hold when `false`
    fn set_profile_enabled(&self, enabled: bool) {
        if enabled {
            self.set_profile_mode(ProfileMode::Enable);
        } else {
            self.hold_last_output();
        }
    }

    /// Hold the last commanded velocity
    fn hold_last_output(&self) {
        self.set_profile_mode(ProfileMode::Hold);
    }

    /// Velocity of the point currently being executed
    fn active_velocity(&self) -> f64;

    /// Drop every buffered point
    fn clear_trajectories(&self);

    /// Clear the sticky underrun flag
    fn clear_underrun(&self);

    /// Select the closed-loop feedback sensor
    fn config_feedback_sensor(&self, device: FeedbackDevice);

    /// Set how often a status frame is reported (ms)
    fn config_status_period(&self, frame: StatusFrame, period_ms: u16);

    /// Set the duration of every trajectory point (ms)
    fn config_trajectory_period(&self, period_ms: u16);

    /// Load gain constants into a parameter slot
    fn config_gains(&self, slot: u8, gains: ClosedLoopGains);
}

impl<T: MotorController + ?Sized> MotorController for &T {
    fn set_percent_output(&self, output: f64) {
        T::set_percent_output(self, output)
    }

    fn control_mode(&self) -> ControlMode {
        T::control_mode(self)
    }

    fn neutral(&self) {
        T::neutral(self)
    }
}

impl<T: MotionProfileController + ?Sized> MotionProfileController for &T {
    fn push_trajectory_point(&self, point: &TrajectoryPoint) -> Result<(), ProfileError> {
        T::push_trajectory_point(self, point)
    }

    fn advance_buffer_window(&self) {
        T::advance_buffer_window(self)
    }

    fn profile_status(&self) -> ProfileStatus {
        T::profile_status(self)
    }

    fn set_profile_mode(&self, mode: ProfileMode) {
        T::set_profile_mode(self, mode)
    }

    fn active_velocity(&self) -> f64 {
        T::active_velocity(self)
    }

    fn clear_trajectories(&self) {
        T::clear_trajectories(self)
    }

    fn clear_underrun(&self) {
        T::clear_underrun(self)
    }

    fn config_feedback_sensor(&self, device: FeedbackDevice) {
        T::config_feedback_sensor(self, device)
    }

    fn config_status_period(&self, frame: StatusFrame, period_ms: u16) {
        T::config_status_period(self, frame, period_ms)
    }

    fn config_trajectory_period(&self, period_ms: u16) {
        T::config_trajectory_period(self, period_ms)
    }

    fn config_gains(&self, slot: u8, gains: ClosedLoopGains) {
        T::config_gains(self, slot, gains)
    }
}
