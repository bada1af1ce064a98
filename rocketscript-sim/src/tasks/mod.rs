//! Embassy async tasks
//!
//! Each task runs independently; the routine outcome is reported to `main`
//! through a signal.

pub mod autonomous;
pub mod plant;
pub mod refill;

pub use autonomous::{autonomous_task, ROUTINE_DONE};
pub use plant::plant_task;
pub use refill::refill_task;

use rocketscript_core::subsystems::Drivetrain;
use rocketscript_core::trajectory::BufferRefill;
use rocketscript_drivers::controller::ProfileController;

/// Drivetrain over the shared controller models
pub type SimDrivetrain = Drivetrain<&'static ProfileController>;

/// Refill driver over the shared drivetrain
pub type SimRefill = BufferRefill<'static, &'static ProfileController>;
