//! Autonomous Functions
//!
//! Concrete behaviors the script runner sequences:
//! - [`DriveTime`]: open-loop drive for a fixed time
//! - [`FollowPath`]: stream and execute a precomputed motion profile
//! - [`ElevatorTo`], [`PlaceHatch`]: elevator positioning

pub mod drive_time;
pub mod elevator;
pub mod follow_path;

pub use drive_time::DriveTime;
pub use elevator::{ElevatorTo, PlaceHatch};
pub use follow_path::FollowPath;
