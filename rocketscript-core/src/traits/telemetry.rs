//! Diagnostic sink trait

/// Key-value diagnostics reporting
///
/// Fire-and-forget: the autonomous logic never reads anything back.
pub trait Telemetry {
    /// Report a numeric value under a key
    fn put_number(&self, key: &str, value: f64);

    /// Report an error message
    fn error(&self, message: &str);
}

/// Sink that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTelemetry;

impl Telemetry for NullTelemetry {
    fn put_number(&self, _key: &str, _value: f64) {}

    fn error(&self, _message: &str) {}
}
