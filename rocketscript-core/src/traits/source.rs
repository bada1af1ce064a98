//! Trajectory record source trait

use alloc::string::String;

/// Errors that can occur reading a trajectory source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SourceError {
    /// No source with that name
    NotFound,
    /// Source exists but could not be read
    Io,
    /// Source is not valid UTF-8 text
    InvalidUtf8,
}

/// Provides the raw text of a named trajectory
///
/// The text is comma-separated records, one header row followed by one
/// row per point.
pub trait TrajectorySource {
    /// Read the full text of the named trajectory
    fn read(&self, name: &str) -> Result<String, SourceError>;
}
