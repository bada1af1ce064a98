//! Hardware-agnostic core of the autonomous routine runner
//!
//! This crate contains all autonomous logic that does not depend on a
//! specific motor controller or robot framework:
//!
//! - Hardware capability traits (motion profile controller, elevator motor,
//!   telemetry sink, trajectory record source)
//! - The `Function` lifecycle contract and the script runner
//! - Trajectory parsing and the motion profile follower
//! - Drivetrain and elevator subsystems
//! - Autonomous mode selection
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod auto;
pub mod config;
pub mod functions;
pub mod script;
pub mod subsystems;
pub mod trajectory;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;
