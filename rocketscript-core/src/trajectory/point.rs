//! Trajectory point and trajectory types

use alloc::vec::Vec;

/// Profile slot every point selects
pub const MIN_PROFILE_SLOT: u8 = 0;

/// One position/velocity setpoint of a motion profile
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TrajectoryPoint {
    /// Target position (encoder units)
    pub position: f64,
    /// Target velocity (encoder units per 100 ms)
    pub velocity: f64,
    /// Gain slot used while this point executes
    pub profile_slot: u8,
    /// Controller zeroes its local profile position on this point
    pub reset_marker: bool,
    /// Final setpoint of the profile
    pub end_marker: bool,
}

impl TrajectoryPoint {
    /// Create an unmarked point
    pub const fn new(position: f64, velocity: f64) -> Self {
        Self {
            position,
            velocity,
            profile_slot: MIN_PROFILE_SLOT,
            reset_marker: false,
            end_marker: false,
        }
    }
}

/// Ordered, immutable sequence of trajectory points for one motor side
///
/// A non-empty trajectory always carries the reset marker on its first
/// point and the end marker on its last point, and on no others.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Trajectory {
    points: Vec<TrajectoryPoint>,
}

impl Trajectory {
    /// Create an empty trajectory ("nothing to follow")
    pub const fn empty() -> Self {
        Self { points: Vec::new() }
    }

    /// Build a trajectory from (position, velocity) setpoints
    pub fn from_setpoints<I>(setpoints: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut points: Vec<TrajectoryPoint> = setpoints
            .into_iter()
            .map(|(position, velocity)| TrajectoryPoint::new(position, velocity))
            .collect();

        if let Some(first) = points.first_mut() {
            first.reset_marker = true;
        }
        if let Some(last) = points.last_mut() {
            last.end_marker = true;
        }

        Self { points }
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if there is nothing to follow
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All points in execution order
    pub fn points(&self) -> &[TrajectoryPoint] {
        &self.points
    }

    /// Iterate over the points in execution order
    pub fn iter(&self) -> core::slice::Iter<'_, TrajectoryPoint> {
        self.points.iter()
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a TrajectoryPoint;
    type IntoIter = core::slice::Iter<'a, TrajectoryPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
