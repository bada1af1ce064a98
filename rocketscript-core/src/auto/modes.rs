//! Autonomous routines

use crate::config::RobotConfig;
use crate::functions::{DriveTime, ElevatorTo, FollowPath, PlaceHatch};
use crate::script::{RunnerState, ScriptError, ScriptRunner};
use crate::subsystems::{Drivetrain, Elevator, Position};
use crate::trajectory::BufferRefill;
use crate::traits::{ElevatorMotor, MotionProfileController, Telemetry, TrajectorySource};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Selectable autonomous routine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AutoMode {
    /// Queue nothing
    #[default]
    DoNothing,
    /// Timed drive across the line
    CrossLine,
    /// Follow the configured trajectory pair
    FollowPath,
    /// Raise to the first hatch level, approach, release
    HatchLevelOne,
}

impl AutoMode {
    /// Short name for diagnostics
    pub const fn as_str(self) -> &'static str {
        match self {
            AutoMode::DoNothing => "do_nothing",
            AutoMode::CrossLine => "cross_line",
            AutoMode::FollowPath => "follow_path",
            AutoMode::HatchLevelOne => "hatch_level_one",
        }
    }
}

/// Autonomous routine selector and runner
///
/// Holds the script runner together with everything the routines need to
/// construct their Functions.
pub struct AutoModes<'a, C, M> {
    drivetrain: &'a Drivetrain<C>,
    elevator: &'a Elevator<M>,
    refill: &'a BufferRefill<'a, C>,
    source: &'a dyn TrajectorySource,
    telemetry: &'a dyn Telemetry,
    config: &'a RobotConfig,
    runner: ScriptRunner<'a>,
    selected: AutoMode,
}

impl<'a, C, M> AutoModes<'a, C, M>
where
    C: MotionProfileController + 'a,
    M: ElevatorMotor + 'a,
{
    /// Create a selector with an empty script
    ///
    /// The configured routine is remembered but not built until
    /// [`select`](Self::select) is called.
    pub fn new(
        drivetrain: &'a Drivetrain<C>,
        elevator: &'a Elevator<M>,
        refill: &'a BufferRefill<'a, C>,
        source: &'a dyn TrajectorySource,
        telemetry: &'a dyn Telemetry,
        config: &'a RobotConfig,
    ) -> Self {
        Self {
            drivetrain,
            elevator,
            refill,
            source,
            telemetry,
            config,
            runner: ScriptRunner::new(),
            selected: config.autonomous,
        }
    }

    /// Most recently selected routine
    pub fn selected(&self) -> AutoMode {
        self.selected
    }

    /// Script runner, for diagnostics
    pub fn runner(&self) -> &ScriptRunner<'a> {
        &self.runner
    }

    /// Abandon the current script and build `mode`'s queue
    pub fn select(&mut self, mode: AutoMode) -> Result<(), ScriptError> {
        self.runner.reset();
        self.refill.halt();
        self.selected = mode;

        match mode {
            AutoMode::DoNothing => Ok(()),
            AutoMode::CrossLine => self.cross_line(),
            AutoMode::FollowPath => {
                let config = self.config;
                self.follow_path(config.path.as_str())
            }
            AutoMode::HatchLevelOne => self.hatch_level_one(),
        }
    }

    /// Queue a timed drive across the line
    pub fn cross_line(&mut self) -> Result<(), ScriptError> {
        let drive = self.config.cross_line;
        self.runner.push(DriveTime::new(
            self.drivetrain,
            drive.speed,
            drive.duration_s,
            self.config.tick_period_ms,
        ))
    }

    /// Queue a profile follower for the trajectory pair `name`
    pub fn follow_path(&mut self, name: &str) -> Result<(), ScriptError> {
        self.runner.push(FollowPath::new(
            self.drivetrain,
            self.refill,
            self.source,
            self.telemetry,
            name,
            self.config.follower,
        ))
    }

    /// Queue the first-level hatch routine
    pub fn hatch_level_one(&mut self) -> Result<(), ScriptError> {
        let approach = self.config.hatch_approach;
        self.runner
            .push(ElevatorTo::new(self.elevator, Position::HatchLevelOne))?;
        self.runner.push(DriveTime::new(
            self.drivetrain,
            approach.speed,
            approach.duration_s,
            self.config.tick_period_ms,
        ))?;
        self.runner.push(PlaceHatch::new(self.elevator))
    }

    /// Advance the selected routine by one control tick
    ///
    /// Must be called exactly once per tick during the autonomous phase.
    pub fn run_selected(&mut self) {
        self.runner.tick();
        if self.runner.is_done() {
            self.refill.halt();
        }
    }

    /// Check if the routine has nothing left to run
    pub fn is_finished(&self) -> bool {
        match self.runner.state() {
            RunnerState::Done => true,
            RunnerState::Idle => self.runner.pending() == 0,
            RunnerState::Running { .. } => false,
        }
    }

    /// End the routine, leaving every subsystem in a safe state
    pub fn cancel(&mut self) {
        self.runner.cancel();
        self.refill.halt();
    }
}
