//! RocketScript - Autonomous Routine Simulator
//!
//! Host harness for the autonomous routine runner. Plays the part of the
//! robot framework: loads the configuration, builds the subsystems over
//! modelled motor controllers and drives the selected routine once per
//! control tick for one autonomous period.
//!
//! Set `RUST_LOG=debug` (or `trace` for every telemetry value) for more
//! detail, and `ROCKETSCRIPT_CONFIG` to run another configuration.

use embassy_executor::Spawner;
use env_logger::Env;
use log::{info, warn};
use static_cell::StaticCell;

use rocketscript_core::config::RobotConfig;
use rocketscript_core::subsystems::Drivetrain;
use rocketscript_core::trajectory::BufferRefill;
use rocketscript_drivers::controller::{ProfileController, SmartMotionController};

use crate::config::{load_config, log_config_summary};
use crate::source::DirectorySource;
use crate::tasks::{SimDrivetrain, SimRefill};

mod config;
mod source;
mod tasks;
mod telemetry;

/// Embedded default configuration
/// Edit robot.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../robot.toml");

/// Trajectory directory bundled with the sim
const PATHS_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/paths");

/// Elevator encoder position at power-on
const ELEVATOR_START_POSITION: f64 = 0.0;

// Static cells for everything the tasks share (must live forever)
static ROBOT_CONFIG: StaticCell<RobotConfig> = StaticCell::new();
static LEFT: StaticCell<ProfileController> = StaticCell::new();
static RIGHT: StaticCell<ProfileController> = StaticCell::new();
static LIFT: StaticCell<SmartMotionController> = StaticCell::new();
static DRIVETRAIN: StaticCell<SimDrivetrain> = StaticCell::new();
static REFILL: StaticCell<SimRefill> = StaticCell::new();
static SOURCE: StaticCell<DirectorySource> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    info!("RocketScript sim starting...");

    let config: &'static RobotConfig = ROBOT_CONFIG.init(load_config(EMBEDDED_CONFIG));
    log_config_summary(config);

    let left: &'static ProfileController = LEFT.init(ProfileController::new());
    let right: &'static ProfileController = RIGHT.init(ProfileController::new());
    let lift: &'static SmartMotionController =
        LIFT.init(SmartMotionController::new(ELEVATOR_START_POSITION));

    let drivetrain: &'static SimDrivetrain = DRIVETRAIN.init(Drivetrain::new(left, right));
    let refill: &'static SimRefill = REFILL.init(BufferRefill::new(drivetrain));

    let source: &'static DirectorySource = SOURCE.init(DirectorySource::new(PATHS_DIR));
    info!("Trajectories from {}", source.root().display());

    spawner.spawn(tasks::plant_task(left, right, lift)).unwrap();
    spawner.spawn(tasks::refill_task(refill, config.tick_period_ms)).unwrap();
    spawner.spawn(tasks::autonomous_task(drivetrain, refill, lift, source, config)).unwrap();

    info!("All tasks spawned");

    let summary = tasks::ROUTINE_DONE.wait().await;
    if summary.timed_out {
        warn!(
            "{} did not finish within {} ms",
            summary.mode.as_str(),
            config.autonomous_ms
        );
    }
    info!(
        "Autonomous complete: {} Functions in {} ticks",
        summary.completed, summary.ticks
    );

    std::process::exit(if summary.timed_out { 1 } else { 0 });
}
