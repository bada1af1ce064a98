//! Elevator motor trait

use super::ClosedLoopGains;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Smart motion (trapezoidal position) configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SmartMotionConfig {
    /// Position loop gains
    pub gains: ClosedLoopGains,
    /// Maximum acceleration (rpm/s)
    pub max_accel: f64,
    /// Maximum cruise velocity (rpm)
    pub max_velocity: f64,
    /// Velocity below which output is considered stopped (rpm)
    pub min_output_velocity: f64,
    /// Allowed closed-loop error (rotations)
    pub allowed_error: f64,
    /// Smart current limit (A)
    pub current_limit_a: u8,
    /// Invert output direction
    pub inverted: bool,
}

impl Default for SmartMotionConfig {
    fn default() -> Self {
        Self {
            gains: ClosedLoopGains::new(0.0003, 0.0, 0.0, 0.0),
            max_accel: 8000.0,
            max_velocity: 15000.0,
            min_output_velocity: 0.1,
            allowed_error: 0.0,
            current_limit_a: 55,
            inverted: false,
        }
    }
}

/// Trait for the elevator's position-controlled motor
///
/// Positions are raw encoder rotations; zero offsets are applied by the
/// [`Elevator`](crate::subsystems::Elevator) subsystem.
pub trait ElevatorMotor {
    /// Apply the one-time smart motion configuration
    fn configure(&self, config: &SmartMotionConfig);

    /// Command a smart motion position reference
    fn set_reference(&self, position: f64);

    /// Drive at an open-loop output (-1.0 to 1.0)
    fn set_percent_output(&self, output: f64);

    /// Raw encoder position (rotations)
    fn encoder_position(&self) -> f64;

    /// Raw encoder velocity (rpm)
    fn encoder_velocity(&self) -> f64;

    /// Output current (A)
    fn output_current(&self) -> f64;
}

impl<T: ElevatorMotor + ?Sized> ElevatorMotor for &T {
    fn configure(&self, config: &SmartMotionConfig) {
        T::configure(self, config)
    }

    fn set_reference(&self, position: f64) {
        T::set_reference(self, position)
    }

    fn set_percent_output(&self, output: f64) {
        T::set_percent_output(self, output)
    }

    fn encoder_position(&self) -> f64 {
        T::encoder_position(self)
    }

    fn encoder_velocity(&self) -> f64 {
        T::encoder_velocity(self)
    }

    fn output_current(&self) -> f64 {
        T::output_current(self)
    }
}
