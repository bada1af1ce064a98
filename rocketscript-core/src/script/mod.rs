//! Script runner
//!
//! Sequences autonomous Functions through their lifecycle, one Function
//! at a time, one step per control tick.

pub mod function;
pub mod runner;

pub use function::{Function, Lifecycle};
pub use runner::{RunnerState, ScriptError, ScriptRunner, MAX_SCRIPT_ENTRIES};
