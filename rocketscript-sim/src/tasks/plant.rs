//! Plant update task
//!
//! Advances the motor controller models in real time.

use embassy_time::{Duration, Instant, Ticker};
use log::info;
use rocketscript_drivers::controller::{ProfileController, SmartMotionController};

/// Plant update interval in milliseconds
pub const PLANT_INTERVAL_MS: u64 = 1;

#[embassy_executor::task]
pub async fn plant_task(
    left: &'static ProfileController,
    right: &'static ProfileController,
    lift: &'static SmartMotionController,
) {
    info!("Plant task started");

    let mut ticker = Ticker::every(Duration::from_millis(PLANT_INTERVAL_MS));
    let mut last = Instant::now();

    loop {
        ticker.next().await;

        // Catch up on any ticks the executor was late for
        let now = Instant::now();
        let elapsed_ms = (now - last).as_millis() as u32;
        if elapsed_ms == 0 {
            continue;
        }
        last += Duration::from_millis(elapsed_ms as u64);

        left.update(elapsed_ms);
        right.update(elapsed_ms);
        lift.update(elapsed_ms);
    }
}
