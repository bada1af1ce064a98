//! Elevator subsystem
//!
//! Smart-motion position control over a single motor. Positions reported
//! to callers are relative to the zero captured at startup or at the last
//! re-zero; the motor itself only sees raw encoder positions.
//!
//! Hatch presets sit one drop offset above their nominal height. Dropping
//! and placing the hatch each lower the set point once; the one-shot flags
//! are cleared only by [`Elevator::reset_encoder`].

use core::cell::Cell;

use crate::config::ElevatorConfig;
use crate::traits::ElevatorMotor;

/// Named elevator heights (relative to zero)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Position {
    Floor,
    HatchLevelOne,
    HatchLevelTwo,
    HatchLevelThree,
    CargoLevelOne,
    CargoLevelTwo,
    CargoLevelThree,
    CargoShip,
    CollectCargo,
    CollectHatch,
}

impl Position {
    /// Nominal height of this preset
    pub fn height(self, config: &ElevatorConfig) -> f64 {
        match self {
            Position::Floor => 0.0,
            Position::HatchLevelOne => 1.5,
            Position::HatchLevelTwo => 22.0,
            Position::HatchLevelThree => 44.5,
            Position::CargoLevelOne => 17.0,
            Position::CargoLevelTwo => 39.5,
            Position::CargoLevelThree => 45.5,
            Position::CargoShip => 30.0,
            Position::CollectCargo => 7.8,
            Position::CollectHatch => config.hatch_drop_offset + config.hatch_place_offset,
        }
    }

    /// Check if this preset carries a hatch panel
    pub fn is_hatch(self) -> bool {
        matches!(
            self,
            Position::HatchLevelOne
                | Position::HatchLevelTwo
                | Position::HatchLevelThree
                | Position::CollectHatch
        )
    }
}

fn distance(a: f64, b: f64) -> f64 {
    if a > b {
        a - b
    } else {
        b - a
    }
}

/// Elevator subsystem state
pub struct Elevator<M> {
    motor: M,
    config: ElevatorConfig,
    /// Raw set point sent to the motor
    set_point: Cell<f64>,
    /// Raw position at the last movement check
    prev_position: Cell<f64>,
    /// Raw position treated as zero
    zero_position: Cell<f64>,
    hatch_drop_applied: Cell<bool>,
    hatch_place_applied: Cell<bool>,
}

impl<M: ElevatorMotor> Elevator<M> {
    /// Create the subsystem; call [`init`](Self::init) before commanding it
    pub fn new(motor: M, config: ElevatorConfig) -> Self {
        Self {
            motor,
            config,
            set_point: Cell::new(0.0),
            prev_position: Cell::new(0.0),
            zero_position: Cell::new(0.0),
            hatch_drop_applied: Cell::new(false),
            hatch_place_applied: Cell::new(false),
        }
    }

    /// Configure the motor and zero at the current position
    pub fn init(&self) {
        self.motor.configure(&self.config.motion);

        let here = self.motor.encoder_position();
        self.zero_position.set(here);
        self.prev_position.set(here);
        self.set_point.set(here);
        self.hatch_drop_applied.set(false);
        self.hatch_place_applied.set(false);
        self.motor.set_reference(here);
    }

    /// Motor handle
    pub fn motor(&self) -> &M {
        &self.motor
    }

    /// Configuration
    pub fn config(&self) -> &ElevatorConfig {
        &self.config
    }

    /// Hold the current position
    pub fn stop(&self) {
        self.set_point.set(self.motor.encoder_position());
        self.apply_limits();
    }

    /// Motor output current (A)
    pub fn current(&self) -> f64 {
        self.motor.output_current()
    }

    /// Set point relative to zero
    pub fn set_point(&self) -> f64 {
        self.set_point.get() - self.zero_position.get()
    }

    /// Position relative to zero
    pub fn position(&self) -> f64 {
        self.motor.encoder_position() - self.zero_position.get()
    }

    /// Encoder velocity (rpm)
    pub fn velocity(&self) -> f64 {
        self.motor.encoder_velocity()
    }

    /// Check if the carriage is above the stationary stage
    pub fn above_stage_threshold(&self) -> bool {
        self.position() > self.config.stage_threshold
    }

    /// Check if the carriage is within the deadband of its set point
    pub fn at_set_point(&self) -> bool {
        distance(self.motor.encoder_position(), self.set_point.get()) <= self.config.deadband
    }

    /// Check if the carriage moved more than the deadband since the last check
    ///
    /// Each call that returns true re-arms the check at the current position.
    pub fn moved_since_last_check(&self) -> bool {
        let here = self.motor.encoder_position();
        if distance(here, self.prev_position.get()) > self.config.deadband {
            self.prev_position.set(here);
            true
        } else {
            false
        }
    }

    /// Open-loop output (-1.0 to 1.0)
    pub fn move_speed(&self, speed: f64) {
        self.motor.set_percent_output(speed.clamp(-1.0, 1.0));
    }

    /// Command a position relative to zero
    pub fn set_position(&self, position: f64) {
        self.set_point.set(position + self.zero_position.get());
        self.apply_limits();
    }

    /// Command a preset; hatch presets are raised by the drop offset
    pub fn set_preset(&self, preset: Position) {
        let height = preset.height(&self.config);
        if preset.is_hatch() {
            self.set_position(height + self.config.hatch_drop_offset);
        } else {
            self.set_position(height);
        }
    }

    /// Lower by the drop offset to release the hatch panel (once)
    pub fn drop_hatch(&self) {
        if self.hatch_drop_applied.get() {
            return;
        }
        self.set_point
            .set(self.set_point.get() - self.config.hatch_drop_offset);
        self.apply_limits();
        self.hatch_drop_applied.set(true);
    }

    /// Lower by the place offset to seat the hatch panel (once)
    pub fn place_hatch(&self) {
        if self.hatch_place_applied.get() {
            return;
        }
        self.set_point
            .set(self.set_point.get() - self.config.hatch_place_offset);
        self.apply_limits();
        self.hatch_place_applied.set(true);
    }

    /// Check if the hatch drop offset has been applied since the last re-zero
    pub fn hatch_drop_applied(&self) -> bool {
        self.hatch_drop_applied.get()
    }

    /// Check if the hatch place offset has been applied since the last re-zero
    pub fn hatch_place_applied(&self) -> bool {
        self.hatch_place_applied.get()
    }

    /// Treat the current position as the new zero and go to the floor
    pub fn reset_encoder(&self) {
        self.zero_position.set(self.motor.encoder_position());
        self.hatch_drop_applied.set(false);
        self.hatch_place_applied.set(false);
        self.set_preset(Position::Floor);
    }

    /// Clamp the set point to [zero, zero + max] and send it
    fn apply_limits(&self) {
        let zero = self.zero_position.get();
        let limited = self
            .set_point
            .get()
            .min(self.config.max_position + zero)
            .max(zero);
        self.set_point.set(limited);
        self.motor.set_reference(limited);
    }
}
