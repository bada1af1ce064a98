//! Timed open-loop drive

use crate::script::{Function, Lifecycle};
use crate::subsystems::Drivetrain;
use crate::traits::MotionProfileController;

/// Drive both sides at a fixed output for a fixed time
///
/// Time is counted in control ticks: every `run` adds one tick period, and
/// the Function finishes once the accumulated time reaches the duration.
pub struct DriveTime<'a, C> {
    drivetrain: &'a Drivetrain<C>,
    speed: f64,
    duration_ms: u32,
    tick_period_ms: u16,
    elapsed_ms: u32,
    phase: Lifecycle,
}

impl<'a, C: MotionProfileController> DriveTime<'a, C> {
    /// Create a timed drive
    ///
    /// - `speed`: output on both sides (-1.0 to 1.0)
    /// - `duration_s`: drive time in seconds, negative treated as zero
    /// - `tick_period_ms`: control loop period
    pub fn new(
        drivetrain: &'a Drivetrain<C>,
        speed: f64,
        duration_s: f64,
        tick_period_ms: u16,
    ) -> Self {
        // `as` saturates negative values to zero
        let duration_ms = (duration_s * 1000.0 + 0.5) as u32;
        Self {
            drivetrain,
            speed,
            duration_ms,
            tick_period_ms,
            elapsed_ms: 0,
            phase: Lifecycle::default(),
        }
    }

    /// Time driven so far (ms)
    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }
}

impl<C: MotionProfileController> Function for DriveTime<'_, C> {
    fn init(&mut self) {
        if self.phase.activate() {
            self.elapsed_ms = 0;
        }
    }

    fn run(&mut self) {
        if !self.phase.check_active() {
            return;
        }
        self.drivetrain.tank_drive(self.speed, self.speed);
        self.elapsed_ms = self.elapsed_ms.saturating_add(self.tick_period_ms as u32);
    }

    fn stop(&mut self) {
        if self.phase.deactivate() {
            self.drivetrain.stop();
        }
    }

    fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }

    fn name(&self) -> &str {
        "DriveTime"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::{RunnerState, ScriptRunner};
    use crate::testing::{Call, MockController};

    fn drivetrain() -> Drivetrain<MockController> {
        Drivetrain::new(MockController::default(), MockController::default())
    }

    #[test]
    fn test_cross_line_scenario() {
        let dt = drivetrain();
        let mut runner = ScriptRunner::new();
        runner.push(DriveTime::new(&dt, 0.5, 2.0, 20)).unwrap();

        // 2.0 s at 20 ms per tick
        for tick in 1..100 {
            runner.tick();
            assert!(
                !runner.is_done(),
                "finished early on tick {}",
                tick
            );
        }

        runner.tick();
        assert_eq!(runner.state(), RunnerState::Done);

        // 100 drive commands then one neutral per side
        assert_eq!(dt.left().count(Call::PercentOutput(0.5)), 100);
        assert_eq!(dt.left().calls().last(), Some(&Call::PercentOutput(0.0)));
        assert_eq!(dt.right().calls().last(), Some(&Call::PercentOutput(0.0)));
    }

    #[test]
    fn test_elapsed_counts_ticks() {
        let dt = drivetrain();
        let mut drive = DriveTime::new(&dt, -0.3, 0.05, 20);
        drive.init();
        drive.run();
        drive.run();
        assert_eq!(drive.elapsed_ms(), 40);
        assert!(!drive.is_finished());
        drive.run();
        assert!(drive.is_finished());
        drive.run();
        assert!(drive.is_finished());
        drive.stop();
        assert_eq!(dt.left().count(Call::PercentOutput(-0.3)), 4);
    }

    #[test]
    fn test_cancel_before_finish_goes_neutral() {
        let dt = drivetrain();
        let mut runner = ScriptRunner::new();
        runner.push(DriveTime::new(&dt, 0.5, 2.0, 20)).unwrap();

        runner.tick();
        runner.cancel();

        assert_eq!(dt.left().calls().last(), Some(&Call::PercentOutput(0.0)));
        assert_eq!(dt.right().calls().last(), Some(&Call::PercentOutput(0.0)));
    }

    #[test]
    fn test_negative_duration_is_zero() {
        let dt = drivetrain();
        let drive = DriveTime::new(&dt, 0.5, -1.0, 20);
        assert!(drive.is_finished());
    }
}
