//! Smart motion position controller model
//!
//! Models a brushless motor controller running a velocity-limited position
//! loop. The carriage accelerates toward the reference at the configured
//! acceleration, cruises at the configured velocity, and slows so it never
//! overshoots.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use rocketscript_core::traits::{ElevatorMotor, SmartMotionConfig};

use super::magnitude;

/// Milliseconds per minute, for rpm conversions
const MS_PER_MINUTE: f64 = 60_000.0;

/// Current drawn at standstill while holding (A)
const HOLDING_CURRENT_A: f64 = 2.0;

#[derive(Clone, Copy)]
enum Command {
    Idle,
    Position(f64),
    Output(f64),
}

struct MotionState {
    config: SmartMotionConfig,
    configured: bool,
    command: Command,
    /// Rotations
    position: f64,
    /// Rotations per ms
    velocity: f64,
}

impl MotionState {
    fn max_velocity(&self) -> f64 {
        self.config.max_velocity / MS_PER_MINUTE
    }

    fn accel_per_ms(&self) -> f64 {
        // rpm/s to rotations/ms per ms
        self.config.max_accel / MS_PER_MINUTE / 1000.0
    }

    fn step(&mut self, dt: f64) {
        let target_velocity = match self.command {
            Command::Idle => 0.0,
            Command::Output(output) => output * self.max_velocity(),
            Command::Position(reference) => {
                let error = reference - self.position;
                if magnitude(error) <= self.config.allowed_error {
                    0.0
                } else {
                    // Never command more than closes the error this step
                    let cap = (magnitude(error) / dt).min(self.max_velocity());
                    if error > 0.0 {
                        cap
                    } else {
                        -cap
                    }
                }
            }
        };

        let max_change = self.accel_per_ms() * dt;
        let change = (target_velocity - self.velocity).clamp(-max_change, max_change);
        self.velocity += change;

        if let Command::Position(reference) = self.command {
            // Snap once the remaining error is within one step
            let error = reference - self.position;
            if magnitude(error) <= magnitude(self.velocity * dt) {
                self.position = reference;
                self.velocity = 0.0;
                return;
            }
        }

        if magnitude(self.velocity) < self.config.min_output_velocity / MS_PER_MINUTE {
            self.velocity = 0.0;
        }
        self.position += self.velocity * dt;
    }
}

/// Smart motion position controller model
pub struct SmartMotionController {
    state: Mutex<CriticalSectionRawMutex, RefCell<MotionState>>,
}

impl SmartMotionController {
    /// Create an unconfigured controller resting at `position`
    pub fn new(position: f64) -> Self {
        Self {
            state: Mutex::new(RefCell::new(MotionState {
                config: SmartMotionConfig::default(),
                configured: false,
                command: Command::Idle,
                position,
                velocity: 0.0,
            })),
        }
    }

    fn with<T>(&self, f: impl FnOnce(&mut MotionState) -> T) -> T {
        self.state.lock(|cell| f(&mut cell.borrow_mut()))
    }

    /// Advance the model by `delta_ms`
    pub fn update(&self, delta_ms: u32) {
        self.with(|s| {
            if !s.configured {
                return;
            }
            for _ in 0..delta_ms {
                s.step(1.0);
            }
        });
    }

    /// Check if `configure` has been applied
    pub fn is_configured(&self) -> bool {
        self.with(|s| s.configured)
    }

    /// Current position reference, if in position mode
    pub fn reference(&self) -> Option<f64> {
        self.with(|s| match s.command {
            Command::Position(reference) => Some(reference),
            _ => None,
        })
    }
}

impl ElevatorMotor for SmartMotionController {
    fn configure(&self, config: &SmartMotionConfig) {
        self.with(|s| {
            s.config = *config;
            s.configured = true;
        });
    }

    fn set_reference(&self, position: f64) {
        self.with(|s| s.command = Command::Position(position));
    }

    fn set_percent_output(&self, output: f64) {
        self.with(|s| s.command = Command::Output(output.clamp(-1.0, 1.0)));
    }

    fn encoder_position(&self) -> f64 {
        self.with(|s| s.position)
    }

    fn encoder_velocity(&self) -> f64 {
        self.with(|s| s.velocity * MS_PER_MINUTE)
    }

    fn output_current(&self) -> f64 {
        self.with(|s| {
            let load = magnitude(s.velocity) / s.max_velocity().max(f64::MIN_POSITIVE);
            let limit = f64::from(s.config.current_limit_a);
            (HOLDING_CURRENT_A + load * limit).min(limit)
        })
    }
}
