//! Tank drivetrain with one motion-profile controller per side

use crate::traits::{MotionProfileController, ProfileStatus};

/// Left/right drivetrain
///
/// Followers slaved to each master controller are configured by the
/// controller layer; the drivetrain only commands the masters.
#[derive(Debug)]
pub struct Drivetrain<C> {
    left: C,
    right: C,
}

impl<C: MotionProfileController> Drivetrain<C> {
    /// Create a drivetrain from its two master controllers
    pub const fn new(left: C, right: C) -> Self {
        Self { left, right }
    }

    /// Left master controller
    pub fn left(&self) -> &C {
        &self.left
    }

    /// Right master controller
    pub fn right(&self) -> &C {
        &self.right
    }

    /// Open-loop tank drive (-1.0 to 1.0 per side)
    pub fn tank_drive(&self, left: f64, right: f64) {
        self.left.set_percent_output(left.clamp(-1.0, 1.0));
        self.right.set_percent_output(right.clamp(-1.0, 1.0));
    }

    /// Command neutral output on both sides
    pub fn stop(&self) {
        self.left.neutral();
        self.right.neutral();
    }

    /// Execute the buffered motion profile, or hold the last velocities
    pub fn motion_profile(&self, enabled: bool) {
        self.left.set_profile_enabled(enabled);
        self.right.set_profile_enabled(enabled);
    }

    /// Left side buffer status
    pub fn left_status(&self) -> ProfileStatus {
        self.left.profile_status()
    }

    /// Right side buffer status
    pub fn right_status(&self) -> ProfileStatus {
        self.right.profile_status()
    }

    /// Velocity of the left side's active trajectory point
    pub fn left_velocity(&self) -> f64 {
        self.left.active_velocity()
    }

    /// Velocity of the right side's active trajectory point
    pub fn right_velocity(&self) -> f64 {
        self.right.active_velocity()
    }
}
