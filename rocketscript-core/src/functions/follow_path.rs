//! Motion profile follower
//!
//! Streams a precomputed left/right trajectory pair into the drivetrain
//! controllers and executes it in closed loop. All points are pushed at
//! construction; the [`BufferRefill`] driver funnels them into the
//! controllers while the follower waits for enough points to start.
//!
//! Execution begins once both bottom buffers hold the start threshold and
//! stays enabled from then on. The follower finishes when both top-level
//! buffers have drained after execution started.

use alloc::format;
use core::fmt::Write;

use heapless::String;

use crate::config::FollowerConfig;
use crate::script::{Function, Lifecycle};
use crate::subsystems::Drivetrain;
use crate::trajectory::{load_trajectory, BufferRefill, Trajectory, MIN_PROFILE_SLOT};
use crate::traits::{MotionProfileController, StatusFrame, Telemetry, TrajectorySource};

/// Telemetry key for the left side's active point velocity
pub const LEFT_VELOCITY_KEY: &str = "MP left vel";

/// Telemetry key for the right side's active point velocity
pub const RIGHT_VELOCITY_KEY: &str = "MP right vel";

/// Follow a named trajectory pair
pub struct FollowPath<'a, C> {
    drivetrain: &'a Drivetrain<C>,
    telemetry: &'a dyn Telemetry,
    config: FollowerConfig,
    left_threshold: u32,
    right_threshold: u32,
    /// A side had nothing to follow
    degraded: bool,
    started: bool,
    phase: Lifecycle,
}

impl<'a, C: MotionProfileController> FollowPath<'a, C> {
    /// Load `{base}_left.csv` and `{base}_right.csv` and stream them
    ///
    /// Both controllers' buffers are cleared before the new points go in.
    ///
    /// Load failures are reported through `telemetry` and leave the
    /// follower degraded: it does nothing and finishes immediately.
    pub fn new(
        drivetrain: &'a Drivetrain<C>,
        refill: &BufferRefill<'_, C>,
        source: &dyn TrajectorySource,
        telemetry: &'a dyn Telemetry,
        base: &str,
        config: FollowerConfig,
    ) -> Self {
        let left = load_trajectory(source, &format!("{}_left.csv", base), telemetry);
        let right = load_trajectory(source, &format!("{}_right.csv", base), telemetry);

        let degraded = left.is_empty() || right.is_empty();
        let mut left_threshold = 0;
        let mut right_threshold = 0;

        if !degraded {
            // Drop whatever an earlier or abandoned profile left buffered
            for side in [drivetrain.left(), drivetrain.right()] {
                side.clear_trajectories();
                side.clear_underrun();
            }

            let left_pushed = stream(drivetrain.left(), &left, "left", telemetry);
            let right_pushed = stream(drivetrain.right(), &right, "right", telemetry);

            let min_points = config.min_points as u32;
            left_threshold = min_points.min(left_pushed);
            right_threshold = min_points.min(right_pushed);

            refill.start();
        }

        Self {
            drivetrain,
            telemetry,
            config,
            left_threshold,
            right_threshold,
            degraded,
            started: false,
            phase: Lifecycle::default(),
        }
    }

    /// Check if closed-loop execution has begun
    pub fn has_started(&self) -> bool {
        self.started
    }

    /// Check if a side had nothing to follow
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    fn configure(&self, controller: &C) {
        let config = &self.config;
        controller.clear_underrun();
        controller.config_trajectory_period(config.point_duration_ms);
        controller.config_feedback_sensor(config.feedback);
        for frame in StatusFrame::PROFILING {
            controller.config_status_period(frame, config.status_period_ms);
        }
        controller.config_gains(MIN_PROFILE_SLOT, config.gains);
    }
}

/// Push every point, stopping at the first refusal
///
/// Returns the number of points accepted. A refusal is reported once.
fn stream<C: MotionProfileController>(
    controller: &C,
    trajectory: &Trajectory,
    side: &str,
    telemetry: &dyn Telemetry,
) -> u32 {
    let mut pushed = 0u32;
    for point in trajectory {
        if let Err(e) = controller.push_trajectory_point(point) {
            let mut msg: String<64> = String::new();
            let _ = write!(
                msg,
                "PathFollower {} push failed after {} points: {:?}",
                side, pushed, e
            );
            telemetry.error(&msg);
            break;
        }
        pushed += 1;
    }
    pushed
}

impl<C: MotionProfileController> Function for FollowPath<'_, C> {
    fn init(&mut self) {
        if !self.phase.activate() || self.degraded {
            return;
        }
        self.configure(self.drivetrain.left());
        self.configure(self.drivetrain.right());
    }

    fn run(&mut self) {
        if !self.phase.check_active() || self.degraded {
            return;
        }

        if !self.started {
            let left = self.drivetrain.left_status();
            let right = self.drivetrain.right_status();
            self.started = left.bottom_buffer_count >= self.left_threshold
                && right.bottom_buffer_count >= self.right_threshold;
        }

        self.drivetrain.motion_profile(self.started);

        self.telemetry
            .put_number(LEFT_VELOCITY_KEY, self.drivetrain.left_velocity());
        self.telemetry
            .put_number(RIGHT_VELOCITY_KEY, self.drivetrain.right_velocity());
    }

    fn stop(&mut self) {
        if self.phase.deactivate() && !self.degraded {
            self.drivetrain.motion_profile(false);
        }
    }

    fn is_finished(&self) -> bool {
        if self.degraded {
            return true;
        }
        self.started
            && self.drivetrain.left_status().top_buffer_count == 0
            && self.drivetrain.right_status().top_buffer_count == 0
    }

    fn name(&self) -> &str {
        "FollowPath"
    }
}
