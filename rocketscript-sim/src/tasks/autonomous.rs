//! Autonomous control loop task
//!
//! Runs the selected routine once per control tick until it finishes or the
//! autonomous period runs out, then cancels it and reports the outcome.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, Ticker};
use log::{debug, error, info, warn};
use rocketscript_core::auto::{AutoMode, AutoModes};
use rocketscript_core::config::RobotConfig;
use rocketscript_core::script::RunnerState;
use rocketscript_core::subsystems::Elevator;
use rocketscript_core::traits::Telemetry;
use rocketscript_drivers::controller::SmartMotionController;

use super::{SimDrivetrain, SimRefill};
use crate::source::DirectorySource;
use crate::telemetry::LogTelemetry;

/// Ticks between periodic status reports
const STATUS_INTERVAL_TICKS: u32 = 25;

/// Outcome of one autonomous period
#[derive(Debug, Clone, Copy)]
pub struct RoutineSummary {
    /// Routine that ran
    pub mode: AutoMode,
    /// Functions that completed normally
    pub completed: usize,
    /// Control ticks executed
    pub ticks: u32,
    /// The autonomous period ended before the routine did
    pub timed_out: bool,
}

/// Signalled once the routine has ended
pub static ROUTINE_DONE: Signal<CriticalSectionRawMutex, RoutineSummary> = Signal::new();

#[embassy_executor::task]
pub async fn autonomous_task(
    drivetrain: &'static SimDrivetrain,
    refill: &'static SimRefill,
    lift: &'static SmartMotionController,
    source: &'static DirectorySource,
    config: &'static RobotConfig,
) {
    info!("Autonomous task started");

    let elevator = Elevator::new(lift, config.elevator);
    elevator.init();

    let telemetry = LogTelemetry;
    let mut auto = AutoModes::new(drivetrain, &elevator, refill, source, &telemetry, config);

    let mode = config.autonomous;
    if let Err(e) = auto.select(mode) {
        error!("Failed to build {}: {:?}", mode.as_str(), e);
    }
    info!(
        "Running {} ({} Functions queued)",
        mode.as_str(),
        auto.runner().pending()
    );

    let mut ticker = Ticker::every(Duration::from_millis(config.tick_period_ms as u64));
    let deadline = Instant::now() + Duration::from_millis(config.autonomous_ms as u64);
    let mut ticks = 0u32;
    let mut timed_out = false;
    let mut last_index = None;

    while !auto.is_finished() {
        ticker.next().await;

        if Instant::now() >= deadline {
            warn!("Autonomous period over with the routine still running");
            timed_out = true;
            break;
        }

        auto.run_selected();
        ticks += 1;

        if let RunnerState::Running { index, .. } = auto.runner().state() {
            if last_index != Some(index) {
                last_index = Some(index);
                info!(
                    "Step {}: {}",
                    index,
                    auto.runner().active_name().unwrap_or("-")
                );
            }
        }

        if ticks % STATUS_INTERVAL_TICKS == 0 {
            telemetry.put_number("Elevator position", elevator.position());
            debug!(
                "tick {}: left {:.2} right {:.2} elevator {:.2}",
                ticks,
                drivetrain.left_velocity(),
                drivetrain.right_velocity(),
                elevator.position()
            );
        }
    }

    let completed = auto.runner().completed();
    auto.cancel();

    info!(
        "Routine {} ended after {} ticks, {} Functions completed",
        mode.as_str(),
        ticks,
        completed
    );

    ROUTINE_DONE.signal(RoutineSummary {
        mode,
        completed,
        ticks,
        timed_out,
    });
}
