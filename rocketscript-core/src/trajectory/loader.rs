//! Trajectory loader
//!
//! Parses comma-separated profile text into a [`Trajectory`]:
//!
//! ```text
//! position,velocity,...
//! 0.0,0.0
//! 0.12,1.5
//! ```
//!
//! The first row is a header and is discarded. Field 0 is the position,
//! field 1 the velocity; further fields are ignored. Blank lines are
//! skipped. Any row with fewer than two fields or a non-numeric
//! position/velocity rejects the whole profile.

use core::fmt::Write;

use alloc::vec::Vec;
use heapless::String;

use super::point::Trajectory;
use crate::traits::{SourceError, Telemetry, TrajectorySource};

/// Maximum length of a loader diagnostic message
const MAX_MESSAGE_LEN: usize = 96;

/// Errors that can occur loading a trajectory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoadError {
    /// The record source could not be read
    Source(SourceError),
    /// A data row could not be parsed (1-based line number)
    MalformedRow { line: usize },
    /// Header present but no data rows
    Empty,
}

impl From<SourceError> for LoadError {
    fn from(e: SourceError) -> Self {
        LoadError::Source(e)
    }
}

/// Parse profile text into a trajectory
pub fn parse_trajectory(text: &str) -> Result<Trajectory, LoadError> {
    let mut setpoints = Vec::new();

    for (index, row) in text.lines().enumerate().skip(1) {
        let row = row.trim();
        if row.is_empty() {
            continue;
        }

        let line = index + 1;
        let mut fields = row.split(',').map(str::trim);
        let position = parse_field(fields.next(), line)?;
        let velocity = parse_field(fields.next(), line)?;
        setpoints.push((position, velocity));
    }

    if setpoints.is_empty() {
        return Err(LoadError::Empty);
    }

    Ok(Trajectory::from_setpoints(setpoints))
}

/// A setpoint must be a finite number
fn parse_field(field: Option<&str>, line: usize) -> Result<f64, LoadError> {
    field
        .and_then(|f| f.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .ok_or(LoadError::MalformedRow { line })
}

/// Load a named trajectory, degrading to an empty one on failure
///
/// Any failure is reported as exactly one telemetry error and yields an
/// empty trajectory, which callers treat as "nothing to follow".
pub fn load_trajectory<S, T>(source: &S, name: &str, telemetry: &T) -> Trajectory
where
    S: TrajectorySource + ?Sized,
    T: Telemetry + ?Sized,
{
    let result = source
        .read(name)
        .map_err(LoadError::from)
        .and_then(|text| parse_trajectory(&text));

    match result {
        Ok(trajectory) => trajectory,
        Err(e) => {
            telemetry.error(&describe(name, e));
            Trajectory::empty()
        }
    }
}

fn describe(name: &str, error: LoadError) -> String<MAX_MESSAGE_LEN> {
    let mut msg = String::new();
    // Truncation of an overlong name is acceptable for a diagnostic
    let _ = match error {
        LoadError::Source(SourceError::NotFound) => {
            write!(msg, "PathFollower file not found: {}", name)
        }
        LoadError::Source(e) => write!(msg, "PathFollower failed to read {}: {:?}", name, e),
        LoadError::MalformedRow { line } => {
            write!(msg, "PathFollower malformed row {} in {}", line, name)
        }
        LoadError::Empty => write!(msg, "PathFollower no points in {}", name),
    };
    msg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MapSource, RecordingTelemetry};
    use alloc::format;
    use alloc::string::String as StdString;
    use proptest::prelude::*;

    const SIX_ROWS: &str = "position,velocity\n\
        0.0,0.0\n\
        0.1,1.0\n\
        0.3,2.0\n\
        0.6,3.0\n\
        0.9,2.0\n\
        1.0,0.0\n";

    #[test]
    fn test_header_plus_six_rows() {
        let traj = parse_trajectory(SIX_ROWS).unwrap();
        assert_eq!(traj.len(), 6);

        let points = traj.points();
        assert!(points[0].reset_marker);
        assert!(points[5].end_marker);
        for p in &points[1..5] {
            assert!(!p.reset_marker);
            assert!(!p.end_marker);
        }
        assert_eq!(points[3].position, 0.6);
        assert_eq!(points[3].velocity, 3.0);
    }

    #[test]
    fn test_extra_fields_and_blank_lines() {
        let text = "pos,vel,dt\r\n1.5, 2.5 ,10\r\n\r\n2.0,0.0,10\r\n";
        let traj = parse_trajectory(text).unwrap();
        assert_eq!(traj.len(), 2);
        assert_eq!(traj.points()[0].velocity, 2.5);
    }

    #[test]
    fn test_malformed_row() {
        let text = "pos,vel\n0.0,0.0\n0.1,fast\n";
        assert_eq!(
            parse_trajectory(text),
            Err(LoadError::MalformedRow { line: 3 })
        );

        let text = "pos,vel\n0.0\n";
        assert_eq!(
            parse_trajectory(text),
            Err(LoadError::MalformedRow { line: 2 })
        );
    }

    #[test]
    fn test_non_finite_row() {
        for row in ["NaN,0.0", "0.0,inf", "-inf,1.0"] {
            let text = format!("pos,vel\n0.0,0.0\n{}\n", row);
            assert_eq!(
                parse_trajectory(&text),
                Err(LoadError::MalformedRow { line: 3 })
            );
        }
    }

    #[test]
    fn test_header_only_is_empty() {
        assert_eq!(parse_trajectory("pos,vel\n"), Err(LoadError::Empty));
        assert_eq!(parse_trajectory(""), Err(LoadError::Empty));
    }

    #[test]
    fn test_missing_source_reports_once() {
        let source = MapSource::default();
        let telemetry = RecordingTelemetry::default();

        let traj = load_trajectory(&source, "nowhere_left.csv", &telemetry);

        assert!(traj.is_empty());
        let errors = telemetry.errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("not found"));
    }

    #[test]
    fn test_malformed_source_reports_once() {
        let source = MapSource::with(&[("bad.csv", "pos,vel\n1.0,x\n2.0,y\n")]);
        let telemetry = RecordingTelemetry::default();

        let traj = load_trajectory(&source, "bad.csv", &telemetry);

        assert!(traj.is_empty());
        assert_eq!(telemetry.errors().len(), 1);
    }

    #[test]
    fn test_load_success_reports_nothing() {
        let source = MapSource::with(&[("path_left.csv", SIX_ROWS)]);
        let telemetry = RecordingTelemetry::default();

        let traj = load_trajectory(&source, "path_left.csv", &telemetry);

        assert_eq!(traj.len(), 6);
        assert!(telemetry.errors().is_empty());
    }

    proptest! {
        #[test]
        fn prop_markers_on_first_and_last(rows in prop::collection::vec((-1e3f64..1e3, -1e3f64..1e3), 1..64)) {
            let mut text = StdString::from("position,velocity\n");
            for (p, v) in &rows {
                text.push_str(&format!("{},{}\n", p, v));
            }

            let traj = parse_trajectory(&text).unwrap();
            let k = rows.len();
            prop_assert_eq!(traj.len(), k);

            for (i, point) in traj.iter().enumerate() {
                prop_assert_eq!(point.reset_marker, i == 0);
                prop_assert_eq!(point.end_marker, i == k - 1);
                prop_assert_eq!(point.position, rows[i].0);
                prop_assert_eq!(point.velocity, rows[i].1);
            }
        }
    }
}
