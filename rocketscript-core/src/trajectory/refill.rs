//! Trajectory buffer refill driver
//!
//! Streams points from the top-level buffers into the controllers while a
//! profile is being followed. Runs on its own periodic trigger at three
//! times the control tick rate so the bottom buffers stay ahead of
//! consumption.
//!
//! The driver shares nothing with the control loop except the
//! controllers' own buffers: it only advances the buffer window, while the
//! control loop only reads counters and switches modes. The arm flag is the
//! one piece of application state and is atomic.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::subsystems::Drivetrain;
use crate::traits::MotionProfileController;

/// Refill period for a control tick period
///
/// Returns microseconds so a 20 ms tick gives a 6666 us refill period
/// instead of truncating to 6 ms.
pub const fn refill_period_us(tick_period_ms: u16) -> u64 {
    tick_period_ms as u64 * 1000 / 3
}

/// Periodic buffer refill driver for both drivetrain sides
pub struct BufferRefill<'a, C> {
    drivetrain: &'a Drivetrain<C>,
    armed: AtomicBool,
}

impl<'a, C: MotionProfileController> BufferRefill<'a, C> {
    /// Create a disarmed refill driver
    pub const fn new(drivetrain: &'a Drivetrain<C>) -> Self {
        Self {
            drivetrain,
            armed: AtomicBool::new(false),
        }
    }

    /// Start refilling on every service call
    pub fn start(&self) {
        self.armed.store(true, Ordering::Release);
    }

    /// Stop refilling
    pub fn halt(&self) {
        self.armed.store(false, Ordering::Release);
    }

    /// Check if the driver is refilling
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    /// Periodic entry point
    ///
    /// Advances both sides' buffer windows when armed; returns whether it
    /// did anything.
    pub fn service(&self) -> bool {
        if !self.is_armed() {
            return false;
        }
        self.drivetrain.left().advance_buffer_window();
        self.drivetrain.right().advance_buffer_window();
        true
    }
}
