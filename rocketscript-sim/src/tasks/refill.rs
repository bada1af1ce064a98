//! Buffer refill task
//!
//! Advances both drivetrain controllers' buffer windows at three times the
//! control tick rate, independent of the autonomous loop.

use embassy_time::{Duration, Ticker};
use log::info;
use rocketscript_core::trajectory::refill_period_us;

use super::SimRefill;

#[embassy_executor::task]
pub async fn refill_task(refill: &'static SimRefill, tick_period_ms: u16) {
    let period_us = refill_period_us(tick_period_ms);
    info!("Refill task started ({} us period)", period_us);

    let mut ticker = Ticker::every(Duration::from_micros(period_us));

    loop {
        ticker.next().await;
        refill.service();
    }
}
