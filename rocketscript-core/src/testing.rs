//! Recording mocks of the capability traits for unit tests

use core::cell::{Cell, RefCell};

use std::collections::BTreeMap;
use std::rc::Rc;
use std::string::{String, ToString};
use std::vec::Vec;

use crate::script::Function;
use crate::traits::{
    ClosedLoopGains, ControlMode, ElevatorMotor, FeedbackDevice, MotionProfileController,
    MotorController, ProfileError, ProfileMode, ProfileStatus, SmartMotionConfig, SourceError,
    StatusFrame, Telemetry, TrajectorySource,
};
use crate::trajectory::TrajectoryPoint;

/// A recorded controller call
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Call {
    PushPoint,
    AdvanceWindow,
    SetMode(ProfileMode),
    PercentOutput(f64),
    ClearTrajectories,
    ClearUnderrun,
    FeedbackSensor(FeedbackDevice),
    StatusPeriod(StatusFrame, u16),
    TrajectoryPeriod(u16),
    Gains(u8, ClosedLoopGains),
}

#[derive(Debug, Default)]
struct MockState {
    calls: Vec<Call>,
    pushed: Vec<TrajectoryPoint>,
    capacity: Option<usize>,
    bottom: u32,
    top: u32,
    velocity: f64,
    mode: ControlMode,
}

/// Motion profile controller whose buffer counters are set by the test
#[derive(Debug, Default)]
pub struct MockController {
    state: RefCell<MockState>,
}

impl MockController {
    /// Refuse pushes beyond `capacity` points
    pub fn with_capacity(capacity: usize) -> Self {
        let mock = Self::default();
        mock.state.borrow_mut().capacity = Some(capacity);
        mock
    }

    pub fn set_counts(&self, bottom: u32, top: u32) {
        let mut state = self.state.borrow_mut();
        state.bottom = bottom;
        state.top = top;
    }

    pub fn set_velocity(&self, velocity: f64) {
        self.state.borrow_mut().velocity = velocity;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn count(&self, call: Call) -> usize {
        self.state.borrow().calls.iter().filter(|c| **c == call).count()
    }

    pub fn last_mode(&self) -> Option<ProfileMode> {
        self.state.borrow().calls.iter().rev().find_map(|c| match c {
            Call::SetMode(mode) => Some(*mode),
            _ => None,
        })
    }

    pub fn pushed(&self) -> Vec<TrajectoryPoint> {
        self.state.borrow().pushed.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }
}

impl MotorController for MockController {
    fn set_percent_output(&self, output: f64) {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::PercentOutput(output));
        state.mode = ControlMode::PercentOutput;
    }

    fn control_mode(&self) -> ControlMode {
        self.state.borrow().mode
    }
}

impl MotionProfileController for MockController {
    fn push_trajectory_point(&self, point: &TrajectoryPoint) -> Result<(), ProfileError> {
        let mut state = self.state.borrow_mut();
        if state.capacity.is_some_and(|cap| state.pushed.len() >= cap) {
            return Err(ProfileError::BufferFull);
        }
        state.calls.push(Call::PushPoint);
        state.pushed.push(*point);
        Ok(())
    }

    fn advance_buffer_window(&self) {
        self.state.borrow_mut().calls.push(Call::AdvanceWindow);
    }

    fn profile_status(&self) -> ProfileStatus {
        let state = self.state.borrow();
        ProfileStatus {
            top_buffer_count: state.top,
            bottom_buffer_count: state.bottom,
            mode: match state.mode {
                ControlMode::MotionProfile(mode) => mode,
                ControlMode::PercentOutput => ProfileMode::Disable,
            },
            ..Default::default()
        }
    }

    fn set_profile_mode(&self, mode: ProfileMode) {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::SetMode(mode));
        state.mode = ControlMode::MotionProfile(mode);
    }

    fn active_velocity(&self) -> f64 {
        self.state.borrow().velocity
    }

    fn clear_trajectories(&self) {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::ClearTrajectories);
        state.pushed.clear();
    }

    fn clear_underrun(&self) {
        self.state.borrow_mut().calls.push(Call::ClearUnderrun);
    }

    fn config_feedback_sensor(&self, device: FeedbackDevice) {
        self.state.borrow_mut().calls.push(Call::FeedbackSensor(device));
    }

    fn config_status_period(&self, frame: StatusFrame, period_ms: u16) {
        self.state
            .borrow_mut()
            .calls
            .push(Call::StatusPeriod(frame, period_ms));
    }

    fn config_trajectory_period(&self, period_ms: u16) {
        self.state
            .borrow_mut()
            .calls
            .push(Call::TrajectoryPeriod(period_ms));
    }

    fn config_gains(&self, slot: u8, gains: ClosedLoopGains) {
        self.state.borrow_mut().calls.push(Call::Gains(slot, gains));
    }
}

/// Elevator motor that reaches any reference instantly unless frozen
#[derive(Debug, Default)]
pub struct MockElevatorMotor {
    position: Cell<f64>,
    reference: Cell<Option<f64>>,
    output: Cell<f64>,
    frozen: Cell<bool>,
    configured: Cell<bool>,
}

impl MockElevatorMotor {
    /// Stop following references
    pub fn freeze(&self) {
        self.frozen.set(true);
    }

    pub fn set_encoder(&self, position: f64) {
        self.position.set(position);
    }

    pub fn reference(&self) -> Option<f64> {
        self.reference.get()
    }

    pub fn output(&self) -> f64 {
        self.output.get()
    }

    pub fn is_configured(&self) -> bool {
        self.configured.get()
    }
}

impl ElevatorMotor for MockElevatorMotor {
    fn configure(&self, _config: &SmartMotionConfig) {
        self.configured.set(true);
    }

    fn set_reference(&self, position: f64) {
        self.reference.set(Some(position));
        if !self.frozen.get() {
            self.position.set(position);
        }
    }

    fn set_percent_output(&self, output: f64) {
        self.output.set(output);
    }

    fn encoder_position(&self) -> f64 {
        self.position.get()
    }

    fn encoder_velocity(&self) -> f64 {
        0.0
    }

    fn output_current(&self) -> f64 {
        1.5
    }
}

/// Telemetry sink that keeps everything it is given
#[derive(Debug, Default)]
pub struct RecordingTelemetry {
    numbers: RefCell<Vec<(String, f64)>>,
    errors: RefCell<Vec<String>>,
}

impl RecordingTelemetry {
    pub fn errors(&self) -> Vec<String> {
        self.errors.borrow().clone()
    }

    pub fn last_number(&self, key: &str) -> Option<f64> {
        self.numbers
            .borrow()
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| *v)
    }
}

impl Telemetry for RecordingTelemetry {
    fn put_number(&self, key: &str, value: f64) {
        self.numbers.borrow_mut().push((key.to_string(), value));
    }

    fn error(&self, message: &str) {
        self.errors.borrow_mut().push(message.to_string());
    }
}

/// In-memory trajectory source
#[derive(Debug, Default)]
pub struct MapSource {
    files: BTreeMap<String, String>,
}

impl MapSource {
    pub fn with(files: &[(&str, &str)]) -> Self {
        Self {
            files: files
                .iter()
                .map(|(name, text)| (name.to_string(), text.to_string()))
                .collect(),
        }
    }
}

impl TrajectorySource for MapSource {
    fn read(&self, name: &str) -> Result<String, SourceError> {
        self.files.get(name).cloned().ok_or(SourceError::NotFound)
    }
}

/// A lifecycle event observed by a [`ProbeFunction`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Init(usize),
    Run(usize),
    Stop(usize),
}

/// Shared log of lifecycle events across probes
pub type EventLog = Rc<RefCell<Vec<Event>>>;

/// Function that records its lifecycle and finishes after a set number of runs
pub struct ProbeFunction {
    id: usize,
    finish_after: Option<usize>,
    runs: usize,
    log: EventLog,
}

impl ProbeFunction {
    /// `finish_after` of `None` never finishes
    pub fn new(id: usize, finish_after: Option<usize>, log: &EventLog) -> Self {
        Self {
            id,
            finish_after,
            runs: 0,
            log: log.clone(),
        }
    }
}

impl Function for ProbeFunction {
    fn init(&mut self) {
        self.log.borrow_mut().push(Event::Init(self.id));
    }

    fn run(&mut self) {
        self.runs += 1;
        self.log.borrow_mut().push(Event::Run(self.id));
    }

    fn stop(&mut self) {
        self.log.borrow_mut().push(Event::Stop(self.id));
    }

    fn is_finished(&self) -> bool {
        self.finish_after.is_some_and(|n| self.runs >= n)
    }

    fn name(&self) -> &str {
        "probe"
    }
}
