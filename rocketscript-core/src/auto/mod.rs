//! Autonomous mode selection
//!
//! Builds the Function queue for the selected routine and exposes the
//! single per-tick entry point the control loop calls during the
//! autonomous phase.

mod modes;

pub use modes::{AutoMode, AutoModes};
