//! Elevator positioning Functions

use crate::script::{Function, Lifecycle};
use crate::subsystems::{Elevator, Position};
use crate::traits::ElevatorMotor;

/// Move the elevator to a preset and wait until it arrives
pub struct ElevatorTo<'a, M> {
    elevator: &'a Elevator<M>,
    preset: Position,
    phase: Lifecycle,
}

impl<'a, M: ElevatorMotor> ElevatorTo<'a, M> {
    /// Target `preset` when activated
    pub fn new(elevator: &'a Elevator<M>, preset: Position) -> Self {
        Self {
            elevator,
            preset,
            phase: Lifecycle::default(),
        }
    }
}

impl<M: ElevatorMotor> Function for ElevatorTo<'_, M> {
    fn init(&mut self) {
        if self.phase.activate() {
            self.elevator.set_preset(self.preset);
        }
    }

    fn run(&mut self) {
        // Smart motion tracks the reference on its own
        self.phase.check_active();
    }

    fn stop(&mut self) {
        // Interrupted mid-travel: hold where the carriage is
        if self.phase.deactivate() && !self.elevator.at_set_point() {
            self.elevator.stop();
        }
    }

    fn is_finished(&self) -> bool {
        self.elevator.at_set_point()
    }

    fn name(&self) -> &str {
        "ElevatorTo"
    }
}

/// Lower the elevator by the drop offset to release the carried hatch panel
pub struct PlaceHatch<'a, M> {
    elevator: &'a Elevator<M>,
    phase: Lifecycle,
}

impl<'a, M: ElevatorMotor> PlaceHatch<'a, M> {
    /// Apply the drop offset when activated
    pub fn new(elevator: &'a Elevator<M>) -> Self {
        Self {
            elevator,
            phase: Lifecycle::default(),
        }
    }
}

impl<M: ElevatorMotor> Function for PlaceHatch<'_, M> {
    fn init(&mut self) {
        if self.phase.activate() {
            self.elevator.drop_hatch();
        }
    }

    fn run(&mut self) {
        self.phase.check_active();
    }

    fn stop(&mut self) {
        if self.phase.deactivate() && !self.elevator.at_set_point() {
            self.elevator.stop();
        }
    }

    fn is_finished(&self) -> bool {
        self.elevator.at_set_point()
    }

    fn name(&self) -> &str {
        "PlaceHatch"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ElevatorConfig;
    use crate::script::ScriptRunner;
    use crate::testing::MockElevatorMotor;

    fn elevator() -> Elevator<MockElevatorMotor> {
        let elevator = Elevator::new(MockElevatorMotor::default(), ElevatorConfig::default());
        elevator.init();
        elevator
    }

    #[test]
    fn test_elevator_to_preset() {
        let elevator = elevator();
        let mut runner = ScriptRunner::new();
        runner.push(ElevatorTo::new(&elevator, Position::CargoShip)).unwrap();

        runner.tick();
        runner.tick();
        assert!(runner.is_done());
        assert_eq!(elevator.set_point(), 30.0);
    }

    #[test]
    fn test_elevator_to_waits_for_arrival() {
        let elevator = elevator();
        elevator.motor().freeze();
        let mut move_up = ElevatorTo::new(&elevator, Position::CargoLevelOne);

        move_up.init();
        move_up.run();
        assert!(!move_up.is_finished());

        elevator.motor().set_encoder(16.8);
        assert!(move_up.is_finished());
    }

    #[test]
    fn test_interrupted_move_holds_position() {
        let elevator = elevator();
        elevator.motor().freeze();
        let mut move_up = ElevatorTo::new(&elevator, Position::CargoLevelTwo);

        move_up.init();
        elevator.motor().set_encoder(12.0);
        move_up.stop();

        assert_eq!(elevator.motor().reference(), Some(12.0));
    }

    #[test]
    fn test_place_hatch_sequence() {
        let elevator = elevator();
        let mut runner = ScriptRunner::new();
        runner
            .push(ElevatorTo::new(&elevator, Position::HatchLevelOne))
            .unwrap();
        runner.push(PlaceHatch::new(&elevator)).unwrap();

        for _ in 0..6 {
            runner.tick();
        }
        assert!(runner.is_done());
        assert!(elevator.hatch_drop_applied());
        assert!((elevator.set_point() - 1.5).abs() < 1e-9);
    }
}
