//! Build script for rocketscript-sim
//!
//! - Validates robot.toml at compile time
//! - Checks that the configured trajectory pair exists under paths/

use std::fs;
use std::path::Path;

const MODES: [&str; 4] = ["do_nothing", "cross_line", "follow_path", "hatch_level_one"];

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    validate_config();
}

/// Validate robot.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=robot.toml");
    println!("cargo:rerun-if-changed=paths");

    let config_path = Path::new("robot.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: robot.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The sim embeds robot.toml as its default configuration.         ║\n\
            ║  Please create one in the rocketscript-sim directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read robot.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in robot.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_timing(&config, &mut errors);
    validate_mode(&config, &mut errors);
    validate_follower(&config, &mut errors);
    validate_elevator(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid configuration in robot.toml                      ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=robot.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn integer(table: &toml::Value, key: &str) -> Option<i64> {
    table.get(key).and_then(|v| v.as_integer())
}

fn float(table: &toml::Value, key: &str) -> Option<f64> {
    table
        .get(key)
        .and_then(|v| v.as_float().or_else(|| v.as_integer().map(|i| i as f64)))
}

/// Validate control loop timing
fn validate_timing(config: &toml::Value, errors: &mut Vec<String>) {
    if let Some(tick) = integer(config, "tick_period_ms") {
        if !(3..=1000).contains(&tick) {
            errors.push("tick_period_ms must be 3-1000".to_string());
        }
    }

    if let Some(length) = integer(config, "autonomous_ms") {
        if length <= 0 {
            errors.push("autonomous_ms must be positive".to_string());
        }
    }
}

/// Validate the routine selection and its trajectory files
fn validate_mode(config: &toml::Value, errors: &mut Vec<String>) {
    let mode = match config.get("autonomous") {
        Some(toml::Value::String(mode)) => mode.as_str(),
        Some(_) => {
            errors.push("autonomous must be a string".to_string());
            return;
        }
        None => return,
    };

    if !MODES.contains(&mode) {
        errors.push(format!("unknown autonomous mode '{}'", mode));
        return;
    }

    if mode != "follow_path" {
        return;
    }

    let Some(path) = config.get("path").and_then(|p| p.as_str()) else {
        errors.push("follow_path requires 'path'".to_string());
        return;
    };

    if path.len() > 32 {
        errors.push("path must be at most 32 characters".to_string());
    }

    for side in ["left", "right"] {
        let file = format!("paths/{}_{}.csv", path, side);
        if !Path::new(&file).exists() {
            errors.push(format!("missing trajectory file {}", file));
        }
    }
}

/// Validate motion profile follower settings
fn validate_follower(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(follower) = config.get("follower") else {
        return;
    };

    if let Some(min_points) = integer(follower, "min_points") {
        if !(1..=128).contains(&min_points) {
            errors.push("[follower] min_points must be 1-128".to_string());
        }
    }

    if let Some(period) = integer(follower, "point_duration_ms") {
        if !(1..=255).contains(&period) {
            errors.push("[follower] point_duration_ms must be 1-255".to_string());
        }
    }

    if let Some(toml::Value::String(feedback)) = follower.get("feedback") {
        let known = ["mag_encoder_relative", "mag_encoder_absolute", "quadrature"];
        if !known.contains(&feedback.as_str()) {
            errors.push(format!("[follower] unknown feedback '{}'", feedback));
        }
    }
}

/// Validate elevator limits
fn validate_elevator(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(elevator) = config.get("elevator") else {
        return;
    };

    if let Some(max) = float(elevator, "max_position") {
        if max <= 0.0 {
            errors.push("[elevator] max_position must be positive".to_string());
        }
    }

    if let Some(deadband) = float(elevator, "deadband") {
        if deadband < 0.0 {
            errors.push("[elevator] deadband cannot be negative".to_string());
        }
    }

    if let Some(limit) = elevator
        .get("motion")
        .and_then(|m| integer(m, "current_limit_a"))
    {
        if !(1..=80).contains(&limit) {
            errors.push("[elevator.motion] current_limit_a must be 1-80".to_string());
        }
    }
}
