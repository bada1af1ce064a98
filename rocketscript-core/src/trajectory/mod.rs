//! Trajectories
//!
//! Parses precomputed motion profiles into immutable point sequences and
//! keeps the motor controllers' trajectory buffers topped up while a
//! profile streams.

pub mod loader;
pub mod point;
pub mod refill;

pub use loader::{load_trajectory, parse_trajectory, LoadError};
pub use point::{Trajectory, TrajectoryPoint, MIN_PROFILE_SLOT};
pub use refill::{refill_period_us, BufferRefill};
