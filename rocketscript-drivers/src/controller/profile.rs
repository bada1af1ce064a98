//! Motion profile controller model
//!
//! This driver models a smart motor controller with on-board motion
//! profile execution:
//! - Top-level buffer filled by the robot code, up to 2048 points
//! - Bottom buffer inside the controller, up to 128 points
//! - One point transferred per buffer window advance
//! - One point consumed per trajectory period while enabled
//! - Sticky underrun flag when the bottom buffer runs dry mid-profile
//!
//! # Usage
//!
//! The model is advanced by calling `update()` periodically with the time
//! elapsed since the previous call.
//!
//! ```ignore
//! let left = ProfileController::new();
//! left.push_trajectory_point(&point)?;
//! left.advance_buffer_window();
//! left.set_profile_mode(ProfileMode::Enable);
//!
//! // In the plant task, every millisecond:
//! left.update(1);
//! ```

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::Deque;
use rocketscript_core::trajectory::TrajectoryPoint;
use rocketscript_core::traits::{
    ClosedLoopGains, ControlMode, FeedbackDevice, MotionProfileController, MotorController,
    ProfileError, ProfileMode, ProfileStatus, StatusFrame,
};

/// Top-level buffer capacity (points)
pub const TOP_BUFFER_CAPACITY: usize = 2048;

/// Bottom buffer capacity (points)
pub const BOTTOM_BUFFER_CAPACITY: usize = 128;

/// Points moved from the top-level to the bottom buffer per advance
const POINTS_PER_ADVANCE: usize = 1;

/// Closed-loop parameter slots
const GAIN_SLOTS: usize = 4;

/// Trajectory period before one is configured (ms)
const DEFAULT_POINT_PERIOD_MS: u16 = 10;

/// Default status frame period (ms)
const DEFAULT_STATUS_PERIOD_MS: u16 = 160;

struct ProfileState {
    top: Deque<TrajectoryPoint, TOP_BUFFER_CAPACITY>,
    bottom: Deque<TrajectoryPoint, BOTTOM_BUFFER_CAPACITY>,
    mode: ControlMode,
    /// Open-loop output (-1.0 to 1.0)
    output: f64,
    /// Point currently being executed
    active: Option<TrajectoryPoint>,
    has_underrun: bool,
    point_period_ms: u16,
    /// Time spent on the active point (ms)
    point_elapsed_ms: u32,
    /// Points executed since the last clear
    executed: u32,
    feedback: FeedbackDevice,
    gains: [ClosedLoopGains; GAIN_SLOTS],
    status_periods: [u16; 4],
}

impl ProfileState {
    fn new() -> Self {
        Self {
            top: Deque::new(),
            bottom: Deque::new(),
            mode: ControlMode::PercentOutput,
            output: 0.0,
            active: None,
            has_underrun: false,
            point_period_ms: DEFAULT_POINT_PERIOD_MS,
            point_elapsed_ms: 0,
            executed: 0,
            feedback: FeedbackDevice::default(),
            gains: [ClosedLoopGains::default(); GAIN_SLOTS],
            status_periods: [DEFAULT_STATUS_PERIOD_MS; 4],
        }
    }

    /// Consume points for `delta_ms` of enabled execution
    fn consume(&mut self, delta_ms: u32) {
        let period = u32::from(self.point_period_ms.max(1));
        self.point_elapsed_ms = self.point_elapsed_ms.saturating_add(delta_ms);

        while self.point_elapsed_ms >= period {
            self.point_elapsed_ms -= period;
            match self.bottom.pop_front() {
                Some(point) => {
                    self.active = Some(point);
                    self.executed = self.executed.saturating_add(1);
                }
                None => {
                    // The last point is held; running dry before it is an underrun
                    if !self.active.is_some_and(|p| p.end_marker) {
                        self.has_underrun = true;
                    }
                    self.point_elapsed_ms = 0;
                    break;
                }
            }
        }
    }

    fn profile_mode(&self) -> ProfileMode {
        match self.mode {
            ControlMode::MotionProfile(mode) => mode,
            ControlMode::PercentOutput => ProfileMode::Disable,
        }
    }
}

fn frame_index(frame: StatusFrame) -> usize {
    match frame {
        StatusFrame::MotionProfileBuffer => 0,
        StatusFrame::Targets => 1,
        StatusFrame::Feedback => 2,
        StatusFrame::Targets1 => 3,
    }
}

/// Motion profile controller model
///
/// All state sits behind a critical-section mutex, so a shared reference is
/// enough for every operation.
pub struct ProfileController {
    state: Mutex<CriticalSectionRawMutex, RefCell<ProfileState>>,
}

impl ProfileController {
    /// Create a controller in percent output mode with empty buffers
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RefCell::new(ProfileState::new())),
        }
    }

    fn with<T>(&self, f: impl FnOnce(&mut ProfileState) -> T) -> T {
        self.state.lock(|cell| f(&mut cell.borrow_mut()))
    }

    /// Advance the model by `delta_ms`
    pub fn update(&self, delta_ms: u32) {
        self.with(|s| {
            if s.mode == ControlMode::MotionProfile(ProfileMode::Enable) {
                s.consume(delta_ms);
            }
        });
    }

    /// Current open-loop output
    pub fn output(&self) -> f64 {
        self.with(|s| s.output)
    }

    /// Position target of the point being executed
    pub fn active_position(&self) -> f64 {
        self.with(|s| s.active.map_or(0.0, |p| p.position))
    }

    /// Points executed since the last clear
    pub fn executed_points(&self) -> u32 {
        self.with(|s| s.executed)
    }

    /// Configured trajectory period (ms)
    pub fn trajectory_period_ms(&self) -> u16 {
        self.with(|s| s.point_period_ms)
    }

    /// Configured feedback sensor
    pub fn feedback(&self) -> FeedbackDevice {
        self.with(|s| s.feedback)
    }

    /// Gains in `slot`, if the slot exists
    pub fn gains(&self, slot: u8) -> Option<ClosedLoopGains> {
        self.with(|s| s.gains.get(slot as usize).copied())
    }

    /// Configured period of a status frame (ms)
    pub fn status_period(&self, frame: StatusFrame) -> u16 {
        self.with(|s| s.status_periods[frame_index(frame)])
    }
}

impl Default for ProfileController {
    fn default() -> Self {
        Self::new()
    }
}

impl MotorController for ProfileController {
    fn set_percent_output(&self, output: f64) {
        self.with(|s| {
            s.mode = ControlMode::PercentOutput;
            s.output = output.clamp(-1.0, 1.0);
        });
    }

    fn control_mode(&self) -> ControlMode {
        self.with(|s| s.mode)
    }
}

impl MotionProfileController for ProfileController {
    fn push_trajectory_point(&self, point: &TrajectoryPoint) -> Result<(), ProfileError> {
        self.with(|s| s.top.push_back(*point).map_err(|_| ProfileError::BufferFull))
    }

    fn advance_buffer_window(&self) {
        self.with(|s| {
            for _ in 0..POINTS_PER_ADVANCE {
                if s.bottom.is_full() {
                    break;
                }
                let Some(point) = s.top.pop_front() else {
                    break;
                };
                // Cannot fail, checked for room above
                let _ = s.bottom.push_back(point);
            }
        });
    }

    fn profile_status(&self) -> ProfileStatus {
        self.with(|s| ProfileStatus {
            top_buffer_count: s.top.len() as u32,
            bottom_buffer_count: s.bottom.len() as u32,
            has_underrun: s.has_underrun,
            active_point_is_last: s.active.is_some_and(|p| p.end_marker),
            mode: s.profile_mode(),
        })
    }

    fn set_profile_mode(&self, mode: ProfileMode) {
        self.with(|s| {
            if s.mode != ControlMode::MotionProfile(mode) {
                s.point_elapsed_ms = 0;
            }
            s.mode = ControlMode::MotionProfile(mode);
            s.output = 0.0;
        });
    }

    fn active_velocity(&self) -> f64 {
        self.with(|s| match s.profile_mode() {
            ProfileMode::Enable | ProfileMode::Hold => s.active.map_or(0.0, |p| p.velocity),
            ProfileMode::Disable => 0.0,
        })
    }

    fn clear_trajectories(&self) {
        self.with(|s| {
            s.top.clear();
            s.bottom.clear();
            s.active = None;
            s.point_elapsed_ms = 0;
            s.executed = 0;
        });
    }

    fn clear_underrun(&self) {
        self.with(|s| s.has_underrun = false);
    }

    fn config_feedback_sensor(&self, device: FeedbackDevice) {
        self.with(|s| s.feedback = device);
    }

    fn config_status_period(&self, frame: StatusFrame, period_ms: u16) {
        self.with(|s| s.status_periods[frame_index(frame)] = period_ms);
    }

    fn config_trajectory_period(&self, period_ms: u16) {
        self.with(|s| s.point_period_ms = period_ms);
    }

    fn config_gains(&self, slot: u8, gains: ClosedLoopGains) {
        self.with(|s| {
            if let Some(entry) = s.gains.get_mut(slot as usize) {
                *entry = gains;
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocketscript_core::trajectory::Trajectory;

    fn ramp(points: usize) -> Trajectory {
        Trajectory::from_setpoints((0..points).map(|i| (i as f64, 10.0 * i as f64)))
    }

    fn load(controller: &ProfileController, trajectory: &Trajectory) {
        for point in trajectory {
            controller.push_trajectory_point(point).unwrap();
        }
    }

    #[test]
    fn test_initial_state() {
        let controller = ProfileController::new();
        let status = controller.profile_status();

        assert_eq!(controller.control_mode(), ControlMode::PercentOutput);
        assert_eq!(status.top_buffer_count, 0);
        assert_eq!(status.bottom_buffer_count, 0);
        assert!(!status.has_underrun);
        assert_eq!(status.mode, ProfileMode::Disable);
    }

    #[test]
    fn test_advance_moves_one_point() {
        let controller = ProfileController::new();
        load(&controller, &ramp(10));

        controller.advance_buffer_window();
        controller.advance_buffer_window();

        assert_eq!(controller.top_level_buffer_count(), 8);
        assert_eq!(controller.bottom_buffer_count(), 2);
    }

    #[test]
    fn test_bottom_buffer_caps_transfer() {
        let controller = ProfileController::new();
        load(&controller, &ramp(BOTTOM_BUFFER_CAPACITY + 10));

        for _ in 0..BOTTOM_BUFFER_CAPACITY + 10 {
            controller.advance_buffer_window();
        }

        assert_eq!(
            controller.bottom_buffer_count(),
            BOTTOM_BUFFER_CAPACITY as u32
        );
        assert_eq!(controller.top_level_buffer_count(), 10);
    }

    #[test]
    fn test_top_buffer_full() {
        let controller = ProfileController::new();
        let point = TrajectoryPoint::new(0.0, 0.0);
        for _ in 0..TOP_BUFFER_CAPACITY {
            controller.push_trajectory_point(&point).unwrap();
        }

        assert_eq!(
            controller.push_trajectory_point(&point),
            Err(ProfileError::BufferFull)
        );
    }

    #[test]
    fn test_enabled_consumes_per_period() {
        let controller = ProfileController::new();
        load(&controller, &ramp(10));
        for _ in 0..10 {
            controller.advance_buffer_window();
        }
        controller.config_trajectory_period(10);

        controller.set_profile_mode(ProfileMode::Enable);
        controller.update(25);

        assert_eq!(controller.executed_points(), 2);
        assert_eq!(controller.bottom_buffer_count(), 8);
        assert_eq!(controller.active_velocity(), 10.0);

        // The remaining 5 ms carry over
        controller.update(5);
        assert_eq!(controller.executed_points(), 3);
    }

    #[test]
    fn test_hold_does_not_consume() {
        let controller = ProfileController::new();
        load(&controller, &ramp(5));
        for _ in 0..5 {
            controller.advance_buffer_window();
        }

        controller.set_profile_mode(ProfileMode::Enable);
        controller.update(10);
        controller.set_profile_mode(ProfileMode::Hold);
        controller.update(100);

        assert_eq!(controller.executed_points(), 1);
        assert_eq!(controller.profile_status().mode, ProfileMode::Hold);
    }

    #[test]
    fn test_underrun_when_starved() {
        let controller = ProfileController::new();
        load(&controller, &ramp(5));
        controller.advance_buffer_window();

        controller.set_profile_mode(ProfileMode::Enable);
        controller.update(30);

        let status = controller.profile_status();
        assert!(status.has_underrun);
        assert!(!status.active_point_is_last);

        controller.clear_underrun();
        assert!(!controller.profile_status().has_underrun);
    }

    #[test]
    fn test_last_point_is_held() {
        let controller = ProfileController::new();
        load(&controller, &ramp(3));
        for _ in 0..3 {
            controller.advance_buffer_window();
        }

        controller.set_profile_mode(ProfileMode::Enable);
        controller.update(100);

        let status = controller.profile_status();
        assert!(status.active_point_is_last);
        assert!(!status.has_underrun);
        assert_eq!(controller.active_position(), 2.0);
    }

    #[test]
    fn test_clear_trajectories() {
        let controller = ProfileController::new();
        load(&controller, &ramp(6));
        controller.advance_buffer_window();

        controller.clear_trajectories();

        let status = controller.profile_status();
        assert_eq!(status.top_buffer_count, 0);
        assert_eq!(status.bottom_buffer_count, 0);
    }

    #[test]
    fn test_configuration_is_stored() {
        let controller = ProfileController::new();
        let gains = ClosedLoopGains::new(0.5, 0.0, 0.0, 0.0);

        controller.config_gains(0, gains);
        controller.config_gains(9, gains);
        controller.config_feedback_sensor(FeedbackDevice::Quadrature);
        controller.config_status_period(StatusFrame::Targets1, 10);

        assert_eq!(controller.gains(0), Some(gains));
        assert_eq!(controller.gains(9), None);
        assert_eq!(controller.feedback(), FeedbackDevice::Quadrature);
        assert_eq!(controller.status_period(StatusFrame::Targets1), 10);
        assert_eq!(controller.status_period(StatusFrame::Targets), 160);
    }

    #[test]
    fn test_percent_output_clamped() {
        let controller = ProfileController::new();
        controller.set_profile_mode(ProfileMode::Enable);
        controller.set_percent_output(1.7);

        assert_eq!(controller.output(), 1.0);
        assert_eq!(controller.control_mode(), ControlMode::PercentOutput);
        assert_eq!(controller.active_velocity(), 0.0);
    }
}
