//! Robot subsystems
//!
//! Each subsystem wraps its motor controller handles and carries its own
//! state. Subsystems are constructed once and shared by reference with the
//! Functions that command them.

pub mod drivetrain;
pub mod elevator;

pub use drivetrain::Drivetrain;
pub use elevator::{Elevator, Position};
