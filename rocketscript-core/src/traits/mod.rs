//! Hardware capability traits
//!
//! These traits define the narrow interface between the autonomous logic
//! and the motor controllers, diagnostics and trajectory storage. Handles
//! are constructed once and shared by reference, so every method takes
//! `&self`; implementations synchronise internally.

pub mod elevator;
pub mod motor;
pub mod source;
pub mod telemetry;

pub use elevator::{ElevatorMotor, SmartMotionConfig};
pub use motor::{
    ClosedLoopGains, ControlMode, FeedbackDevice, MotionProfileController, MotorController,
    ProfileError, ProfileMode, ProfileStatus, StatusFrame,
};
pub use source::{SourceError, TrajectorySource};
pub use telemetry::{NullTelemetry, Telemetry};
