//! Telemetry backed by the `log` facade

use log::{error, trace};
use rocketscript_core::traits::Telemetry;

/// Writes numbers at trace level and errors at error level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTelemetry;

impl Telemetry for LogTelemetry {
    fn put_number(&self, key: &str, value: f64) {
        trace!("{} = {:.3}", key, value);
    }

    fn error(&self, message: &str) {
        error!("{}", message);
    }
}
