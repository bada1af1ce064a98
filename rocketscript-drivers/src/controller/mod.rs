//! Motor controller models

pub mod profile;
pub mod smart_motion;

pub use profile::{ProfileController, BOTTOM_BUFFER_CAPACITY, TOP_BUFFER_CAPACITY};
pub use smart_motion::SmartMotionController;

/// Magnitude of a float without relying on std
pub(crate) fn magnitude(value: f64) -> f64 {
    if value < 0.0 {
        -value
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocketscript_core::auto::{AutoMode, AutoModes};
    use rocketscript_core::config::{FollowerConfig, RobotConfig};
    use rocketscript_core::functions::FollowPath;
    use rocketscript_core::script::ScriptRunner;
    use rocketscript_core::subsystems::{Drivetrain, Elevator};
    use rocketscript_core::trajectory::BufferRefill;
    use rocketscript_core::traits::{
        MotionProfileController, NullTelemetry, ProfileMode, SourceError, TrajectorySource,
    };
    use std::format;
    use std::string::String;

    /// Generates `points` rows for any requested name
    struct RampSource {
        points: usize,
    }

    impl TrajectorySource for RampSource {
        fn read(&self, _name: &str) -> Result<String, SourceError> {
            let mut text = String::from("position,velocity\n");
            for i in 0..self.points {
                text.push_str(&format!("{},{}\n", i as f64 * 0.1, 5.0));
            }
            Ok(text)
        }
    }

    #[test]
    fn test_follow_path_against_models() {
        let drivetrain = Drivetrain::new(ProfileController::new(), ProfileController::new());
        let refill = BufferRefill::new(&drivetrain);
        let source = RampSource { points: 50 };
        let follower = FollowPath::new(
            &drivetrain,
            &refill,
            &source,
            &NullTelemetry,
            "ramp",
            FollowerConfig::default(),
        );
        assert_eq!(drivetrain.left().top_level_buffer_count(), 50);

        let mut runner = ScriptRunner::new();
        runner.push(follower).unwrap();

        // 20 ms ticks, refill at three times the tick rate
        let mut ticks = 0;
        while !runner.is_done() {
            for _ in 0..3 {
                refill.service();
            }
            runner.tick();
            drivetrain.left().update(20);
            drivetrain.right().update(20);
            ticks += 1;
            assert!(ticks < 100, "follower never finished");
        }

        for side in [drivetrain.left(), drivetrain.right()] {
            let status = side.profile_status();
            assert_eq!(status.top_buffer_count, 0);
            assert_eq!(status.mode, ProfileMode::Hold);
            assert!(!status.has_underrun);
            assert!(side.executed_points() > 0);
            assert_eq!(side.trajectory_period_ms(), 10);
        }
    }

    #[test]
    fn test_reselecting_follow_path_discards_stale_points() {
        let drivetrain = Drivetrain::new(ProfileController::new(), ProfileController::new());
        let refill = BufferRefill::new(&drivetrain);
        let config = RobotConfig::default();
        let elevator = Elevator::new(SmartMotionController::new(0.0), config.elevator);
        let source = RampSource { points: 50 };
        let mut auto = AutoModes::new(
            &drivetrain,
            &elevator,
            &refill,
            &source,
            &NullTelemetry,
            &config,
        );

        auto.select(AutoMode::FollowPath).unwrap();
        auto.run_selected();
        auto.cancel();

        auto.select(AutoMode::FollowPath).unwrap();
        for side in [drivetrain.left(), drivetrain.right()] {
            assert_eq!(side.top_level_buffer_count(), 50);
            assert_eq!(side.bottom_buffer_count(), 0);
        }

        let mut ticks = 0;
        while !auto.is_finished() {
            for _ in 0..3 {
                refill.service();
            }
            auto.run_selected();
            drivetrain.left().update(20);
            drivetrain.right().update(20);
            ticks += 1;
            assert!(ticks < 100, "follower never finished");
        }
        assert_eq!(auto.runner().completed(), 1);
    }
}
